//! Serde integration
//!
//! A section of a parsed [`Store`] can be deserialized into any type that
//! implements `Deserialize`. Fields never assigned in the input take their
//! declared defaults, so the target sees every field of the section.

use crate::error::DeError;
use crate::parser::Parser;
use crate::store::Store;
use crate::value::Value;
use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};

/// Deserializer over a borrowed [`Value`]
pub struct ValueDeserializer<'a> {
    value: &'a Value,
}

impl<'a> ValueDeserializer<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'de, 'a> IntoDeserializer<'de, DeError> for &'a Value {
    type Deserializer = ValueDeserializer<'a>;

    fn into_deserializer(self) -> Self::Deserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'_> {
    type Error = DeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_str(s),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Int64(i) => visitor.visit_i64(*i),
            Value::Uint64(u) => visitor.visit_u64(*u),
            Value::Float64(f) => visitor.visit_f64(*f),
            Value::List(items) => {
                let mut seq = SeqDeserializer::<_, DeError>::new(items.iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Value::Opaque(_) => Err(DeError::Opaque),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // Every field has a value (assigned or default)
        visitor.visit_some(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            other => Err(de::Error::custom(format!(
                "expected one of {:?} for enum {}, found {} value",
                variants,
                name,
                other.kind()
            ))),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl Parser {
    /// Deserializes one section of `store` into `T`
    ///
    /// Struct fields map to ini field names. Unassigned fields use their
    /// declared defaults. Opaque values cannot be deserialized.
    pub fn deserialize_section<T: DeserializeOwned>(
        &self,
        store: &Store,
        section: &str,
    ) -> Result<T, DeError> {
        let schema = self
            .section(section)
            .ok_or_else(|| DeError::UnknownSection(section.to_string()))?;
        let entries = schema
            .fields()
            .map(|field| (field.name(), field.value_or_default(store)));
        T::deserialize(MapDeserializer::<_, DeError>::new(entries))
    }
}
