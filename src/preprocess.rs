//! Value preprocessing: variable expansion, trimming and quote stripping
//!
//! The steps always run in that order, on scalar assignment text and on each
//! list element independently.

use std::collections::HashMap;

/// Trait for resolving variables during expansion
pub trait VariableHandler: Send + Sync {
    /// Resolves a variable by name
    fn resolve_variable(&self, name: &str) -> Option<String>;
}

/// Environment variable handler
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentVariableHandler;

impl VariableHandler for EnvironmentVariableHandler {
    fn resolve_variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Map-based variable handler
#[derive(Debug, Clone, Default)]
pub struct MapVariableHandler {
    variables: HashMap<String, String>,
}

impl MapVariableHandler {
    /// Creates a new map variable handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handler from an existing map
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Inserts a variable
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Gets a reference to the internal map
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

impl VariableHandler for MapVariableHandler {
    fn resolve_variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }
}

impl<F> VariableHandler for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve_variable(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Options that drive [`preprocess`]
#[derive(Clone, Copy)]
pub struct Preprocessor<'a> {
    /// Set when variable expansion is enabled
    pub variables: Option<&'a dyn VariableHandler>,
    /// Quote character, `None` disables stripping
    pub quote_char: Option<char>,
}

impl Preprocessor<'_> {
    /// Expands, trims and unquotes raw value text
    pub fn preprocess(&self, raw: &str) -> String {
        let expanded = match self.variables {
            Some(handler) => expand_variables(raw, handler),
            None => raw.to_string(),
        };
        let trimmed = expanded.trim();
        match self.quote_char {
            Some(q) => strip_quotes(trimmed, q).to_string(),
            None => trimmed.to_string(),
        }
    }
}

/// Expands `$NAME`, `${NAME}` and `$$` in a single pass
///
/// Unbound names expand to the empty string. Expanded text is never
/// rescanned. A `$` not followed by a name, `{` or `$` is kept literally, as
/// is an unterminated `${`.
pub fn expand_variables(input: &str, handler: &dyn VariableHandler) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        match chars.peek() {
            Some((_, '$')) => {
                chars.next();
                result.push('$');
            }
            Some((_, '{')) => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    result.push_str(&handler.resolve_variable(&name).unwrap_or_default());
                } else {
                    result.push_str(&input[start..]);
                }
            }
            Some((_, c)) if is_variable_char(*c) => {
                let mut name = String::new();
                while let Some((_, c)) = chars.peek() {
                    if !is_variable_char(*c) {
                        break;
                    }
                    name.push(*c);
                    chars.next();
                }
                result.push_str(&handler.resolve_variable(&name).unwrap_or_default());
            }
            _ => result.push('$'),
        }
    }

    result
}

fn is_variable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Removes one matching quote from each end of `text`
///
/// Both ends must carry the quote and the text must be at least two
/// characters long, so a lone quote is left alone.
pub fn strip_quotes(text: &str, quote: char) -> &str {
    let q = quote.len_utf8();
    if text.len() >= 2 * q && text.starts_with(quote) && text.ends_with(quote) {
        &text[q..text.len() - q]
    } else {
        text
    }
}
