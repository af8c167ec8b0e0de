//! The validated, typed result of a load.
//!
//! A [`Configuration`] maps section names to [`SectionValues`], which map
//! variable names to [`Value`]s. Both levels ignore case on every lookup:
//!
//! ```ignore
//! let conf = schema.loader().text(source).load()?;
//! assert_eq!(conf["section1"]["name"], conf["SECTION1"]["Name"]);
//! ```
//!
//! Indexing panics on unknown names, like `HashMap` indexing does; use
//! [`Configuration::get`] and [`SectionValues::get`] for fallible access.

use std::ops::Index;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::normalize;
use crate::types::Value;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    value: Value,
}

/// The values of one section, keyed case-insensitively by variable name.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionValues {
    name: String,
    values: IndexMap<String, Entry>,
}

impl SectionValues {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: IndexMap::new(),
        }
    }

    pub(crate) fn set(&mut self, name: &str, value: Value) {
        self.set_keyed(name, name, value);
    }

    /// Store `value` under `ident` for lookups, displayed as `name`.
    pub(crate) fn set_keyed(&mut self, ident: &str, name: &str, value: Value) {
        self.values.insert(
            normalize(ident),
            Entry {
                name: name.to_string(),
                value,
            },
        );
    }

    /// The section name as declared in the schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.values.get(&normalize(variable)).map(|e| &e.value)
    }

    /// The display name of `variable`, as declared (upper-cased).
    pub fn name_of(&self, variable: &str) -> Option<&str> {
        self.values.get(&normalize(variable)).map(|e| e.name.as_str())
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.values.contains_key(&normalize(variable))
    }

    /// `(declared name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.values().map(|e| (e.name.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<&str> for SectionValues {
    type Output = Value;

    fn index(&self, variable: &str) -> &Value {
        self.get(variable)
            .unwrap_or_else(|| panic!("no variable '{variable}' in section [{}]", self.name))
    }
}

impl Serialize for SectionValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A typed configuration for one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    environment: String,
    sections: IndexMap<String, SectionValues>,
}

impl Configuration {
    pub(crate) fn new(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            sections: IndexMap::new(),
        }
    }

    pub(crate) fn push_section(&mut self, section: SectionValues) {
        self.sections.insert(normalize(&section.name), section);
    }

    /// The environment this configuration was validated against, as declared.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn get(&self, section: &str) -> Option<&SectionValues> {
        self.sections.get(&normalize(section))
    }

    pub fn contains_section(&self, section: &str) -> bool {
        self.sections.contains_key(&normalize(section))
    }

    /// Shorthand for `get(section)?.get(variable)`.
    pub fn value(&self, section: &str, variable: &str) -> Option<&Value> {
        self.get(section)?.get(variable)
    }

    /// Sections in schema declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionValues> {
        self.sections.values()
    }
}

impl Index<&str> for Configuration {
    type Output = SectionValues;

    fn index(&self, section: &str) -> &SectionValues {
        self.get(section)
            .unwrap_or_else(|| panic!("no section [{section}] in configuration"))
    }
}

impl Serialize for Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in self.sections.values() {
            map.serialize_entry(&section.name, section)?;
        }
        map.end()
    }
}
