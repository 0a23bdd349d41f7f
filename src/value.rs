//! Typed values held by a [`Store`](crate::Store)
//!
//! Every value produced by a coercion is one of a closed set of variants.
//! Accessors match on the variant instead of downcasting an erased type, so
//! a mismatch between a field's declared type and the requested type is
//! caught at the accessor.

use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// List value storage - uses SmallVec to avoid heap allocation for short lists (≤4 elements)
pub type ValueList = SmallVec<[Value; 4]>;

/// A coerced field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    /// Lists use Box<SmallVec> to avoid infinite size recursion
    List(Box<ValueList>),
    /// Caller-defined representation produced by a custom coercion
    Opaque(Opaque),
}

impl Value {
    /// Builds a list value from its elements
    pub fn list<I: IntoIterator<Item = Value>>(elements: I) -> Self {
        Value::List(Box::new(elements.into_iter().collect()))
    }

    /// Wraps an arbitrary caller type
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Opaque::new(value))
    }

    /// Returns the representation tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int64(_) => ValueKind::Int64,
            Value::Uint64(_) => ValueKind::Uint64,
            Value::Float64(_) => ValueKind::Float64,
            Value::List(_) => ValueKind::List,
            Value::Opaque(o) => ValueKind::Opaque(o.inner_type_id()),
        }
    }

    /// Returns a reference to the string if this is a String variant
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Returns the boolean value if this is a Bool variant
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Returns the integer value if this is an Int64 variant
    pub fn as_int64(&self) -> Option<i64> {
        if let Value::Int64(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Returns the integer value if this is a Uint64 variant
    pub fn as_uint64(&self) -> Option<u64> {
        if let Value::Uint64(u) = self {
            Some(*u)
        } else {
            None
        }
    }

    /// Returns the float value if this is a Float64 variant
    pub fn as_float64(&self) -> Option<f64> {
        if let Value::Float64(f) = self {
            Some(*f)
        } else {
            None
        }
    }

    /// Returns the elements if this is a List variant
    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(items) = self {
            Some(items.as_slice())
        } else {
            None
        }
    }

    /// Returns the caller type behind an Opaque variant
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if let Value::Opaque(o) = self {
            o.downcast_ref()
        } else {
            None
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint64(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

/// Shared handle to a caller-defined value
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    fn inner_type_id(&self) -> TypeId {
        (*self.0).type_id()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque(..)")
    }
}

// Opaque values have no structural equality; two handles are equal when they
// share the same allocation.
impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Runtime representation tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Int64,
    Uint64,
    Float64,
    List,
    Opaque(TypeId),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("string"),
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Int64 => f.write_str("int64"),
            ValueKind::Uint64 => f.write_str("uint64"),
            ValueKind::Float64 => f.write_str("float64"),
            ValueKind::List => f.write_str("list"),
            ValueKind::Opaque(_) => f.write_str("opaque"),
        }
    }
}
