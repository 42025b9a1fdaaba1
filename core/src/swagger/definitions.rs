#![deny(missing_docs)]

//! # Definitions Registry
//!
//! Name-keyed store of models for one document build.

use crate::swagger::model::Model;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Registry of named models in insertion order.
///
/// Entries are registered if absent and never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    entries: IndexMap<String, Model>,
}

impl Definitions {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `model` under `name` unless the name is taken.
    ///
    /// Returns `true` when the model was inserted.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, model: Model) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::trace!(definition = %name, "definition already registered, keeping existing entry");
            return false;
        }
        tracing::trace!(definition = %name, "registering definition");
        self.entries.insert(name, model);
        true
    }

    /// Whether a model is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks up a model by name.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.entries.get(name)
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Model)> {
        self.entries.iter()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the registry as the `definitions` object.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (name, model) in &self.entries {
            obj.insert(name.clone(), model.to_json());
        }
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut defs = Definitions::new();
        assert!(defs.insert_if_absent("Shield", Model::object().with_title("first")));
        assert!(!defs.insert_if_absent("Shield", Model::object().with_title("second")));
        assert_eq!(defs.len(), 1);
        assert_eq!(
            defs.get("Shield").and_then(|m| m.title.as_deref()),
            Some("first")
        );
    }
}
