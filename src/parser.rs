//! The parser: schema registry, options and the line-scanning engine
//!
//! Parsing is a single sequential pass over the input. The engine keeps the
//! current section and, while a bracketed list literal is open, the list
//! being collected. The first error aborts the parse.

use crate::error::{IniError, NameKind, ParseError, ParseErrorKind, SchemaError};
use crate::lexer::{Line, LineLexer, is_valid_name};
use crate::list::{Feed, ListAccumulator};
use crate::preprocess::{EnvironmentVariableHandler, Preprocessor, VariableHandler};
use crate::schema::{Field, Section};
use crate::store::Store;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Configuration options for the parser
///
/// Options are read at the start of every parse, so they may be changed
/// between parses of the same schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Lines whose first non-whitespace character is this are ignored
    pub comment_char: char,
    /// Values starting and ending with this character have it stripped;
    /// `None` disables stripping
    pub quote_char: Option<char>,
    /// Expand `$NAME`, `${NAME}` and `$$` in values
    pub expand_variables: bool,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comment character
    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }

    /// Sets the quote character, or disables stripping with `None`
    pub fn with_quote_char(mut self, quote_char: Option<char>) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Sets whether variables are expanded
    pub fn with_expand_variables(mut self, expand: bool) -> Self {
        self.expand_variables = expand;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            comment_char: '#',
            quote_char: Some('"'),
            expand_variables: false,
        }
    }
}

/// A schema plus parsing options
///
/// Registration takes `&mut self` and parsing takes `&self`, so the schema
/// cannot change while a parse is running. A `Parser` may be shared across
/// threads for concurrent parses.
pub struct Parser {
    config: ParserConfig,
    variables: Arc<dyn VariableHandler>,
    sections: IndexMap<String, Section>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.config)
            .field("sections", &self.sections)
            .finish_non_exhaustive()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Creates a parser with default options and an empty schema
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            variables: Arc::new(EnvironmentVariableHandler),
            sections: IndexMap::new(),
        }
    }

    /// Replaces the lookup used for variable expansion (the process
    /// environment by default)
    pub fn with_variable_handler<H: VariableHandler + 'static>(mut self, handler: H) -> Self {
        self.variables = Arc::new(handler);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ParserConfig {
        &mut self.config
    }

    /// Adds a new section
    ///
    /// Panics if the name is invalid or already registered; see
    /// [`Parser::try_add_section`].
    #[track_caller]
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        match self.try_add_section(name) {
            Ok(section) => section,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_add_section(&mut self, name: &str) -> Result<&mut Section, SchemaError> {
        if !is_valid_name(name) {
            return Err(SchemaError::InvalidName {
                kind: NameKind::Section,
                name: name.to_string(),
            });
        }
        if self.sections.contains_key(name) {
            return Err(SchemaError::DuplicateSection {
                name: name.to_string(),
            });
        }
        let entry = self.sections.entry(name.to_string());
        Ok(entry.or_insert_with(|| Section::new(name)))
    }

    /// Looks up a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Looks up a section for adding more fields
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Sections in registration order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Parses a string
    pub fn parse_str(&self, input: &str) -> Result<Store, ParseError> {
        self.parse(input.as_bytes())
    }

    /// Opens and parses a file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Store, IniError> {
        let file = File::open(path)?;
        Ok(self.parse(file)?)
    }

    /// Parses the whole stream against the schema
    pub fn parse<R: Read>(&self, reader: R) -> Result<Store, ParseError> {
        debug!(
            sections = self.sections.len(),
            comment_char = %self.config.comment_char,
            expand_variables = self.config.expand_variables,
            "starting parse"
        );
        let result = Engine::new(self).run(BufReader::new(reader));
        match &result {
            Ok(store) => debug!(present = store.sections().count(), "parse finished"),
            Err(e) => debug!(line = e.line, error = %e, "parse failed"),
        }
        result
    }
}

/// Open list literal state
struct OpenList<'p> {
    field: &'p Field,
    acc: ListAccumulator,
}

enum State<'p> {
    NoSection,
    InSection(&'p Section),
    InList(&'p Section, OpenList<'p>),
}

impl<'p> State<'p> {
    fn section_name(&self) -> Option<&'p str> {
        match self {
            State::NoSection => None,
            State::InSection(s) | State::InList(s, _) => Some(Section::name(*s)),
        }
    }
}

struct Engine<'p> {
    parser: &'p Parser,
    lexer: LineLexer,
    pre: Preprocessor<'p>,
    store: Store,
    line: usize,
}

impl<'p> Engine<'p> {
    fn new(parser: &'p Parser) -> Self {
        let config = &parser.config;
        Self {
            parser,
            lexer: LineLexer::new(config.comment_char),
            pre: Preprocessor {
                variables: config.expand_variables.then_some(parser.variables.as_ref()),
                quote_char: config.quote_char,
            },
            store: Store::default(),
            line: 0,
        }
    }

    fn run<B: BufRead>(mut self, reader: B) -> Result<Store, ParseError> {
        let mut state = State::NoSection;
        for text in reader.lines() {
            self.line += 1;
            let text = text.map_err(|e| self.error(state.section_name(), ParseErrorKind::Io(e)))?;
            state = self.step(state, &text)?;
        }

        match state {
            State::InList(section, open) => Err(self.error(
                Some(section.name()),
                ParseErrorKind::UnterminatedList {
                    field: open.field.name().to_string(),
                },
            )),
            _ => Ok(self.store),
        }
    }

    fn step(&mut self, state: State<'p>, text: &str) -> Result<State<'p>, ParseError> {
        if self.lexer.is_blank(text) {
            return Ok(state);
        }
        let current = state.section_name();
        let section = match state {
            State::InList(section, mut open) => {
                let feed = open.acc.feed(self.line, text);
                return self.after_feed(section, open, feed);
            }
            State::InSection(section) => Some(section),
            State::NoSection => None,
        };

        match self.lexer.classify(text) {
            Line::Blank => Ok(section.map_or(State::NoSection, State::InSection)),
            Line::Header(name) => {
                let Some(next) = self.parser.sections.get(name) else {
                    return Err(self.error(
                        current,
                        ParseErrorKind::UndefinedSection {
                            name: name.to_string(),
                        },
                    ));
                };
                trace!(line = self.line, section = name, "entering section");
                self.store.mark_present(name);
                Ok(State::InSection(next))
            }
            Line::Assignment { name, value } => {
                let Some(section) = section else {
                    return Err(self.error(
                        current,
                        ParseErrorKind::OutsideSection {
                            field: name.to_string(),
                        },
                    ));
                };
                let Some(field) = section.field(name) else {
                    return Err(self.error(
                        current,
                        ParseErrorKind::NoSuchField {
                            field: name.to_string(),
                        },
                    ));
                };
                self.assign(section, field, value)
            }
            Line::Other => Err(self.error(current, ParseErrorKind::InvalidSyntax)),
        }
    }

    fn assign(
        &mut self,
        section: &'p Section,
        field: &'p Field,
        raw: &str,
    ) -> Result<State<'p>, ParseError> {
        if !field.is_list() {
            let value = self.coerce(self.line, section, field, raw)?;
            self.store.set(section.name(), field.name(), value);
            return Ok(State::InSection(section));
        }

        let Some(rest) = ListAccumulator::opening(raw) else {
            let value = self.coerce(self.line, section, field, raw)?;
            self.store.append(section.name(), field.name(), [value]);
            return Ok(State::InSection(section));
        };

        trace!(line = self.line, field = field.name(), "opening list literal");
        let mut open = OpenList {
            field,
            acc: ListAccumulator::new(self.pre.quote_char),
        };
        let feed = open.acc.feed(self.line, rest);
        self.after_feed(section, open, feed)
    }

    fn after_feed(
        &mut self,
        section: &'p Section,
        open: OpenList<'p>,
        feed: Feed,
    ) -> Result<State<'p>, ParseError> {
        match feed {
            Feed::Open => Ok(State::InList(section, open)),
            Feed::Closed => {
                self.close_list(section, open)?;
                Ok(State::InSection(section))
            }
            Feed::TrailingText => Err(self.error(Some(section.name()), ParseErrorKind::InvalidSyntax)),
        }
    }

    fn close_list(&mut self, section: &'p Section, open: OpenList<'p>) -> Result<(), ParseError> {
        let elements = open.acc.into_elements();
        trace!(
            line = self.line,
            field = open.field.name(),
            elements = elements.len(),
            "closing list literal"
        );
        let values = elements
            .iter()
            .map(|e| self.coerce(e.line, section, open.field, &e.text))
            .collect::<Result<Vec<_>, _>>()?;
        self.store.append(section.name(), open.field.name(), values);
        Ok(())
    }

    /// Preprocesses and coerces one value, reporting failures at `line`
    fn coerce(
        &self,
        line: usize,
        section: &Section,
        field: &Field,
        raw: &str,
    ) -> Result<Value, ParseError> {
        let text = self.pre.preprocess(raw);
        match field.coercion().coerce(&text) {
            Some(value) => {
                field.check_kind(&value);
                Ok(value)
            }
            None => Err(ParseError::new(
                line,
                Some(section.name()),
                ParseErrorKind::InvalidValue {
                    value: text,
                    field: field.name().to_string(),
                },
            )),
        }
    }

    fn error(&self, section: Option<&str>, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.line, section, kind)
    }
}
