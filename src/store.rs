//! The result of a successful parse

use crate::value::{Value, ValueList};
use indexmap::IndexMap;

/// Parsed values, keyed by section and field name
///
/// A store owns its values and refers to the schema only by name, so it
/// outlives the [`Parser`](crate::Parser) that produced it. It is never
/// modified after the parse returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    sections: IndexMap<String, SectionStore>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SectionStore {
    values: IndexMap<String, Value>,
}

impl Store {
    /// True if the section's header appeared in the input, even with no assignments
    pub fn is_section_present(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// The assigned value of a field, or `None` if it was never assigned
    pub fn get_value(&self, section: &str, field: &str) -> Option<&Value> {
        self.sections.get(section)?.values.get(field)
    }

    /// Names of the present sections, in order of first appearance
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Assigned fields of a section, in order of first assignment
    pub fn fields<'a>(&'a self, section: &str) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.sections
            .get(section)
            .into_iter()
            .flat_map(|s| s.values.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub(crate) fn mark_present(&mut self, section: &str) {
        self.section_mut(section);
    }

    /// Stores a scalar value; the last assignment wins
    pub(crate) fn set(&mut self, section: &str, field: &str, value: Value) {
        self.section_mut(section)
            .values
            .insert(field.to_string(), value);
    }

    /// Appends list elements in input order
    pub(crate) fn append<I: IntoIterator<Item = Value>>(
        &mut self,
        section: &str,
        field: &str,
        elements: I,
    ) {
        let slot = self
            .section_mut(section)
            .values
            .entry(field.to_string())
            .or_insert_with(|| Value::List(Box::new(ValueList::new())));
        if let Value::List(items) = slot {
            items.extend(elements);
        }
    }

    fn section_mut(&mut self, section: &str) -> &mut SectionStore {
        self.sections.entry(section.to_string()).or_default()
    }
}
