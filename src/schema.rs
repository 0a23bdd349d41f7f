//! Schema declaration: sections, fields and typed accessors
//!
//! A schema is built before parsing and only read afterwards. Registration
//! problems are programming errors: the `add_*` methods panic on them, while
//! the `try_*` variants return the [`SchemaError`] instead.

use crate::coerce::Coercion;
use crate::error::{NameKind, SchemaError};
use crate::lexer::is_valid_name;
use crate::store::Store;
use crate::value::{Value, ValueKind};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Bool,
    Int64,
    Uint64,
    Float64,
    StringList,
    Float64List,
    /// Caller-defined type; the tag is not interpreted
    User(u32),
}

impl FieldType {
    /// True for the built-in list tags
    pub fn is_list(self) -> bool {
        matches!(self, FieldType::StringList | FieldType::Float64List)
    }

    /// Representation required of values (or list elements) of this type
    fn value_kind(self) -> Option<ValueKind> {
        match self {
            FieldType::String | FieldType::StringList => Some(ValueKind::String),
            FieldType::Bool => Some(ValueKind::Bool),
            FieldType::Int64 => Some(ValueKind::Int64),
            FieldType::Uint64 => Some(ValueKind::Uint64),
            FieldType::Float64 | FieldType::Float64List => Some(ValueKind::Float64),
            FieldType::User(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int64 => f.write_str("int64"),
            FieldType::Uint64 => f.write_str("uint64"),
            FieldType::Float64 => f.write_str("float64"),
            FieldType::StringList => f.write_str("string list"),
            FieldType::Float64List => f.write_str("float64 list"),
            FieldType::User(tag) => write!(f, "user type {}", tag),
        }
    }
}

/// A field declaration, also usable as an accessor handle on a [`Store`]
///
/// Handles are cheap to clone and hold no reference into the parser.
#[derive(Debug, Clone)]
pub struct Field {
    section: String,
    name: String,
    ty: FieldType,
    list: bool,
    default: Value,
    coercion: Coercion,
    /// Representation every coerced value (or list element) must have
    kind: Option<ValueKind>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the section the field belongs to
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// True if assignments append to a list instead of replacing the value
    pub fn is_list(&self) -> bool {
        self.list
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub(crate) fn coercion(&self) -> &Coercion {
        &self.coercion
    }

    /// Checks a coerced value against the field's representation
    ///
    /// A mismatch means the coercion and the default disagree, which is a
    /// defect in the schema rather than in the input.
    #[track_caller]
    pub(crate) fn check_kind(&self, value: &Value) {
        if let Some(kind) = self.kind {
            if value.kind() != kind {
                panic!(
                    "coercion for field {} of section {} produced {}, expected {}",
                    self.name,
                    self.section,
                    value.kind(),
                    kind
                );
            }
        }
    }

    /// True if the field was assigned in the parsed input
    pub fn present(&self, store: &Store) -> bool {
        self.value(store).is_some()
    }

    /// The assigned value, if any
    pub fn value<'s>(&self, store: &'s Store) -> Option<&'s Value> {
        store.get_value(&self.section, &self.name)
    }

    /// The assigned value, or the declared default
    pub fn value_or_default<'a>(&'a self, store: &'a Store) -> &'a Value {
        self.value(store).unwrap_or(&self.default)
    }

    #[track_caller]
    pub fn bool_val(&self, store: &Store) -> bool {
        match self.typed_value(store, FieldType::Bool) {
            Value::Bool(b) => *b,
            other => self.corrupt(other),
        }
    }

    #[track_caller]
    pub fn string_val<'a>(&'a self, store: &'a Store) -> &'a str {
        match self.typed_value(store, FieldType::String) {
            Value::String(s) => s,
            other => self.corrupt(other),
        }
    }

    #[track_caller]
    pub fn int64_val(&self, store: &Store) -> i64 {
        match self.typed_value(store, FieldType::Int64) {
            Value::Int64(i) => *i,
            other => self.corrupt(other),
        }
    }

    #[track_caller]
    pub fn uint64_val(&self, store: &Store) -> u64 {
        match self.typed_value(store, FieldType::Uint64) {
            Value::Uint64(u) => *u,
            other => self.corrupt(other),
        }
    }

    #[track_caller]
    pub fn float64_val(&self, store: &Store) -> f64 {
        match self.typed_value(store, FieldType::Float64) {
            Value::Float64(f) => *f,
            other => self.corrupt(other),
        }
    }

    #[track_caller]
    pub fn string_list_val(&self, store: &Store) -> Vec<String> {
        self.list_elements(store, FieldType::StringList)
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => self.corrupt(other),
            })
            .collect()
    }

    #[track_caller]
    pub fn float64_list_val(&self, store: &Store) -> Vec<f64> {
        self.list_elements(store, FieldType::Float64List)
            .iter()
            .map(|v| match v {
                Value::Float64(f) => *f,
                other => self.corrupt(other),
            })
            .collect()
    }

    /// The caller type behind an opaque value, if the value holds a `T`
    pub fn opaque_val<'a, T: Any>(&'a self, store: &'a Store) -> Option<&'a T> {
        self.value_or_default(store).downcast_ref::<T>()
    }

    #[track_caller]
    fn typed_value<'a>(&'a self, store: &'a Store, expected: FieldType) -> &'a Value {
        if self.ty != expected {
            panic!(
                "{} accessor on {} field {} of section {}",
                expected, self.ty, self.name, self.section
            );
        }
        self.value_or_default(store)
    }

    #[track_caller]
    fn list_elements<'a>(&'a self, store: &'a Store, expected: FieldType) -> &'a [Value] {
        match self.typed_value(store, expected) {
            Value::List(items) => items.as_slice(),
            other => self.corrupt(other),
        }
    }

    #[track_caller]
    fn corrupt(&self, value: &Value) -> ! {
        panic!(
            "field {} of section {} holds a {} value",
            self.name,
            self.section,
            value.kind()
        )
    }
}

/// A named group of fields
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    fields: IndexMap<String, Field>,
}

impl Section {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in registration order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// True if the section header appeared in the parsed input
    pub fn present(&self, store: &Store) -> bool {
        store.is_section_present(&self.name)
    }

    /// Adds a boolean field; `true`, `false`, or empty (meaning true)
    #[track_caller]
    pub fn add_bool(&mut self, name: &str) -> Field {
        self.add(name, FieldType::Bool, false, Coercion::Bool)
    }

    #[track_caller]
    pub fn add_string(&mut self, name: &str) -> Field {
        self.add(name, FieldType::String, "", Coercion::String)
    }

    #[track_caller]
    pub fn add_int64(&mut self, name: &str) -> Field {
        self.add(name, FieldType::Int64, 0i64, Coercion::Int64)
    }

    #[track_caller]
    pub fn add_uint64(&mut self, name: &str) -> Field {
        self.add(name, FieldType::Uint64, 0u64, Coercion::Uint64)
    }

    #[track_caller]
    pub fn add_float64(&mut self, name: &str) -> Field {
        self.add(name, FieldType::Float64, 0.0, Coercion::Float64)
    }

    #[track_caller]
    pub fn add_string_list(&mut self, name: &str) -> Field {
        self.add_list(name, FieldType::StringList, Value::list([]), Coercion::String)
    }

    #[track_caller]
    pub fn add_float64_list(&mut self, name: &str) -> Field {
        self.add_list(name, FieldType::Float64List, Value::list([]), Coercion::Float64)
    }

    /// Adds a scalar field with an explicit default and coercion
    ///
    /// Panics if the registration is invalid; see [`Section::try_add`].
    #[track_caller]
    pub fn add(
        &mut self,
        name: &str,
        ty: FieldType,
        default: impl Into<Value>,
        coercion: Coercion,
    ) -> Field {
        self.try_add(name, ty, default, coercion)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Adds a list field whose elements use `element` for coercion
    ///
    /// Panics if the registration is invalid; see [`Section::try_add_list`].
    #[track_caller]
    pub fn add_list(&mut self, name: &str, ty: FieldType, default: Value, element: Coercion) -> Field {
        self.try_add_list(name, ty, default, element)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_add(
        &mut self,
        name: &str,
        ty: FieldType,
        default: impl Into<Value>,
        coercion: Coercion,
    ) -> Result<Field, SchemaError> {
        let default = default.into();
        if ty.is_list() {
            return Err(SchemaError::InvalidTypeTag {
                field: name.to_string(),
                message: format!("{} is a list type", ty),
            });
        }
        let kind = match ty.value_kind() {
            Some(kind) => {
                check_default(name, kind, &default)?;
                kind
            }
            None => default.kind(),
        };
        self.register(name, ty, false, default, coercion, Some(kind))
    }

    pub fn try_add_list(
        &mut self,
        name: &str,
        ty: FieldType,
        default: Value,
        element: Coercion,
    ) -> Result<Field, SchemaError> {
        if !ty.is_list() && !matches!(ty, FieldType::User(_)) {
            return Err(SchemaError::InvalidTypeTag {
                field: name.to_string(),
                message: format!("{} is not a list type", ty),
            });
        }
        let Value::List(elements) = &default else {
            return Err(SchemaError::DefaultTypeMismatch {
                field: name.to_string(),
                expected: ValueKind::List.to_string(),
                found: default.kind().to_string(),
            });
        };
        let kind = ty
            .value_kind()
            .or_else(|| elements.first().map(Value::kind));
        if let Some(kind) = kind {
            for element in elements.iter() {
                check_default(name, kind, element)?;
            }
        }
        self.register(name, ty, true, default, element, kind)
    }

    fn register(
        &mut self,
        name: &str,
        ty: FieldType,
        list: bool,
        default: Value,
        coercion: Coercion,
        kind: Option<ValueKind>,
    ) -> Result<Field, SchemaError> {
        if !is_valid_name(name) {
            return Err(SchemaError::InvalidName {
                kind: NameKind::Field,
                name: name.to_string(),
            });
        }
        if self.fields.contains_key(name) {
            return Err(SchemaError::DuplicateField {
                section: self.name.clone(),
                field: name.to_string(),
            });
        }
        let field = Field {
            section: self.name.clone(),
            name: name.to_string(),
            ty,
            list,
            default,
            coercion,
            kind,
        };
        self.fields.insert(name.to_string(), field.clone());
        Ok(field)
    }
}

fn check_default(field: &str, expected: ValueKind, value: &Value) -> Result<(), SchemaError> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(SchemaError::DefaultTypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            found: value.kind().to_string(),
        })
    }
}
