//! Error types for schema registration, parsing and deserialization
//!
//! Parse errors are ordinary values returned to the caller: malformed input
//! is expected. Schema errors describe defects in the calling code and are
//! raised as panics by the registration methods.

use std::fmt;
use std::io;
use thiserror::Error;

/// Error returned by a failed parse
///
/// Parsing is all-or-nothing, so a `ParseError` never carries a partial store.
#[derive(Debug, Error)]
#[error("line {line}{}: {kind}", in_section(.section))]
pub struct ParseError {
    /// Line number (1-based) where the error was detected
    pub line: usize,
    /// Section that was active at the time, if any
    pub section: Option<String>,
    /// What went wrong
    #[source]
    pub kind: ParseErrorKind,
}

fn in_section(section: &Option<String>) -> String {
    match section {
        Some(name) => format!(" in section {}", name),
        None => String::new(),
    }
}

impl ParseError {
    /// Creates a new parse error
    pub fn new(line: usize, section: Option<&str>, kind: ParseErrorKind) -> Self {
        Self {
            line,
            section: section.map(str::to_string),
            kind,
        }
    }

    /// The human-readable message without the line/section prefix
    pub fn irritant(&self) -> String {
        self.kind.to_string()
    }

    /// Section name, or the empty string if the error occurred outside any section
    pub fn section_name(&self) -> &str {
        self.section.as_deref().unwrap_or("")
    }
}

/// The individual parse failures
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// A bracketed header names a section that was never registered
    #[error("undefined section {name}")]
    UndefinedSection { name: String },

    /// An assignment appeared before any section header
    #[error("setting {field} outside section")]
    OutsideSection { field: String },

    /// The current section has no field of this name
    #[error("no such field {field}")]
    NoSuchField { field: String },

    /// The field's coercion rejected the preprocessed text
    #[error("value '{value}' not valid for field {field}")]
    InvalidValue { value: String, field: String },

    /// The line is neither blank, a comment, a header nor an assignment
    #[error("invalid syntax")]
    InvalidSyntax,

    /// Input ended inside a bracketed list literal
    #[error("unterminated list for field {field}")]
    UnterminatedList { field: String },

    /// The underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Kind of name being registered, used in [`SchemaError::InvalidName`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Section,
    Field,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Section => f.write_str("section"),
            NameKind::Field => f.write_str("field"),
        }
    }
}

/// Programming errors detected while building a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Name does not match `[-a-zA-Z0-9_$]+`
    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: NameKind, name: String },

    #[error("duplicated section name {name}")]
    DuplicateSection { name: String },

    #[error("duplicated field name {field} in section {section}")]
    DuplicateField { section: String, field: String },

    /// A list tag used for a scalar field or vice versa
    #[error("invalid type tag for field {field}: {message}")]
    InvalidTypeTag { field: String, message: String },

    /// The default value's representation does not match the type tag
    #[error("default value for field {field} must be {expected}, found {found}")]
    DefaultTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

/// Top-level error for the convenience entry points that open files
#[derive(Debug, Error)]
pub enum IniError {
    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error while opening the input
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Serde integration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeError {
    /// Custom serde error message
    #[error("{0}")]
    Custom(String),

    /// The requested section is not part of the schema
    #[error("no such section {0}")]
    UnknownSection(String),

    /// Opaque values carry no serde representation
    #[error("opaque values cannot be deserialized")]
    Opaque,
}

impl serde::de::Error for DeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DeError::Custom(msg.to_string())
    }
}
