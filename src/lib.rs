//! # Typed INI
//!
//! A schema-driven parser for sectioned, line-oriented `key = value` files.
//!
//! ## Overview
//!
//! The caller declares up front which sections exist and which typed fields
//! each section may contain. Parsing a stream against that schema either
//! yields an immutable [`Store`] of typed values or a [`ParseError`] naming
//! the offending line.
//!
//! ## Key Features
//!
//! - **Typed Fields**: bool, string, int64, uint64, float64, string and
//!   float64 lists, plus caller-defined types with their own coercion
//! - **Defaults**: every field has a default returned when it is not assigned
//! - **List Literals**: bracketed, comma-separated, multi-line list values
//!   with comments between elements
//! - **Quote Stripping**: matching quotes around a value are removed
//! - **Variable Expansion**: optional `$NAME`, `${NAME}` and `$$` expansion
//!   through a pluggable [`VariableHandler`]
//! - **Serde Integration**: deserialize a section straight into a struct
//!
//! ## Basic Usage
//!
//! ```rust
//! use typed_ini::Parser;
//!
//! let mut parser = Parser::new();
//! let global = parser.add_section("global");
//! let verbose = global.add_bool("verbose");
//!
//! let user = parser.add_section("user");
//! let name = user.add_string("name");
//! let level = user.add_uint64("level");
//! let factors = user.add_float64_list("factors");
//!
//! let store = parser.parse_str(r#"
//! ## hi there
//! [global]
//! verbose = true
//!
//! [user]
//!  name=Frank
//! level= 37
//! factors = [
//! ## Initially easy
//! 10, 20,
//!
//! ## But gradually much harder
//! 23.5, "38.25",
//! ]
//! "#)?;
//!
//! assert!(verbose.bool_val(&store));
//! assert_eq!(name.string_val(&store), "Frank");
//! assert_eq!(level.uint64_val(&store), 37);
//! assert_eq!(factors.float64_list_val(&store), vec![10.0, 20.0, 23.5, 38.25]);
//! # Ok::<(), typed_ini::ParseError>(())
//! ```
//!
//! ## Custom Types
//!
//! ```rust
//! use typed_ini::{Coercion, FieldType, Parser, Value};
//!
//! #[derive(Debug, PartialEq)]
//! enum Level { Low, High }
//!
//! let mut parser = Parser::new();
//! let level = parser.add_section("app").add(
//!     "level",
//!     FieldType::User(1),
//!     Value::opaque(Level::Low),
//!     Coercion::custom(|s| match s {
//!         "low" => Some(Value::opaque(Level::Low)),
//!         "high" => Some(Value::opaque(Level::High)),
//!         _ => None,
//!     }),
//! );
//!
//! let store = parser.parse_str("[app]\nlevel = high\n")?;
//! assert_eq!(level.opaque_val::<Level>(&store), Some(&Level::High));
//! # Ok::<(), typed_ini::ParseError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use typed_ini::{ParseErrorKind, Parser};
//!
//! let mut parser = Parser::new();
//! parser.add_section("sect").add_int64("x");
//!
//! let err = parser.parse_str("x = 1\n[sect]\n").unwrap_err();
//! assert_eq!(err.line, 1);
//! assert!(matches!(err.kind, ParseErrorKind::OutsideSection { .. }));
//! ```
//!
//! Registration mistakes (bad names, duplicates, a default of the wrong
//! type) are programming errors and panic; the `try_*` registration methods
//! return a [`SchemaError`] instead. Typed accessors panic when used on a
//! field of another type.

pub mod coerce;
pub mod deserializer;
pub mod error;
pub mod lexer;
mod list;
pub mod parser;
pub mod preprocess;
pub mod schema;
pub mod store;
pub mod value;

#[cfg(test)]
mod error_tests;

// Re-export main types and functions
pub use coerce::{CoerceFn, Coercion, parse_bool, parse_float64, parse_int64, parse_uint64};
pub use deserializer::ValueDeserializer;
pub use error::{DeError, IniError, NameKind, ParseError, ParseErrorKind, SchemaError};
pub use lexer::is_valid_name;
pub use parser::{Parser, ParserConfig};
pub use schema::{Field, FieldType, Section};
pub use store::Store;
pub use value::{Opaque, Value, ValueKind, ValueList};

// Re-export variable handler types
pub use preprocess::{
    EnvironmentVariableHandler, MapVariableHandler, VariableHandler, expand_variables,
    strip_quotes,
};
