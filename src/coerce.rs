//! Value coercion: preprocessed text to typed [`Value`]
//!
//! Built-in coercions cover the primitive field types. Anything else is a
//! [`Coercion::Custom`] carrying a caller function. `None` from a coercion
//! means the text is not valid for the field.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied coercion function
pub type CoerceFn = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// A field's (or list element's) text-to-value conversion
#[derive(Clone)]
pub enum Coercion {
    /// `"true"` or empty → true, `"false"` → false
    Bool,
    /// Identity, always valid
    String,
    /// Base-10 signed 64-bit integer
    Int64,
    /// Base-10 unsigned 64-bit integer
    Uint64,
    /// Base-10 decimal with optional exponent
    Float64,
    Custom(CoerceFn),
}

impl Coercion {
    /// Wraps a closure as a custom coercion
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Coercion::Custom(Arc::new(f))
    }

    /// Converts preprocessed text, returning `None` when it is invalid
    pub fn coerce(&self, text: &str) -> Option<Value> {
        match self {
            Coercion::Bool => parse_bool(text).map(Value::Bool),
            Coercion::String => Some(Value::String(text.to_string())),
            Coercion::Int64 => parse_int64(text).map(Value::Int64),
            Coercion::Uint64 => parse_uint64(text).map(Value::Uint64),
            Coercion::Float64 => parse_float64(text).map(Value::Float64),
            Coercion::Custom(f) => f(text),
        }
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Bool => f.write_str("Bool"),
            Coercion::String => f.write_str("String"),
            Coercion::Int64 => f.write_str("Int64"),
            Coercion::Uint64 => f.write_str("Uint64"),
            Coercion::Float64 => f.write_str("Float64"),
            Coercion::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Parses a boolean; the empty string means true
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn parse_int64(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}

pub fn parse_uint64(text: &str) -> Option<u64> {
    text.parse::<u64>().ok()
}

/// Parses a signed decimal float with an optional exponent
///
/// `str::parse::<f64>` also accepts `inf`, `infinity` and `nan`; those are
/// not decimal numbers and are rejected here.
pub fn parse_float64(text: &str) -> Option<f64> {
    let is_decimal = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal || !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}
