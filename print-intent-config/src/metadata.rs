//! Profile metadata as published by the profile registry.
//!
//! Every profile (intent, quality, material, ...) is described by a flat
//! mapping of string keys to values. Only a handful of keys matter to intent
//! selection; they are listed in [`keys`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata keys understood by the registry filters.
pub mod keys {
    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const DEFINITION: &str = "definition";
    pub const VARIANT: &str = "variant";
    pub const MATERIAL_ID: &str = "material_id";
    pub const QUALITY_TYPE: &str = "quality_type";
    pub const INTENT_CATEGORY: &str = "intent_category";
}

/// Values of the `type` key.
pub mod container_types {
    pub const INTENT: &str = "intent";
    pub const QUALITY: &str = "quality";
}

/// Immutable key/value description of one profile.
///
/// Values are JSON-like so that non-string entries (weights, flags) survive
/// untouched; the typed accessors only look at string values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileMetadata {
    entries: BTreeMap<String, Value>,
}

impl ProfileMetadata {
    /// Create metadata carrying only an `id`.
    pub fn new(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self::default().with(keys::ID, id)
    }

    /// Wrap an existing mapping.
    pub fn from_map(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Builder method to set an entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder method to set the container type (`intent`, `quality`, ...)
    pub fn container_type(self, kind: &str) -> Self {
        self.with(keys::TYPE, kind)
    }

    /// Builder method to set the printer definition
    pub fn definition(self, definition: &str) -> Self {
        self.with(keys::DEFINITION, definition)
    }

    /// Builder method to set the nozzle variant
    pub fn variant(self, variant: &str) -> Self {
        self.with(keys::VARIANT, variant)
    }

    /// Builder method to set the material id
    pub fn material_id(self, material_id: &str) -> Self {
        self.with(keys::MATERIAL_ID, material_id)
    }

    /// Builder method to set the quality type
    pub fn quality_type(self, quality_type: &str) -> Self {
        self.with(keys::QUALITY_TYPE, quality_type)
    }

    /// Builder method to set the intent category
    pub fn intent_category(self, category: &str) -> Self {
        self.with(keys::INTENT_CATEGORY, category)
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// String value for `key`; `None` when missing or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(keys::ID)
    }

    pub fn kind(&self) -> Option<&str> {
        self.get_str(keys::TYPE)
    }

    pub fn get_definition(&self) -> Option<&str> {
        self.get_str(keys::DEFINITION)
    }

    pub fn get_quality_type(&self) -> Option<&str> {
        self.get_str(keys::QUALITY_TYPE)
    }

    pub fn get_intent_category(&self) -> Option<&str> {
        self.get_str(keys::INTENT_CATEGORY)
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
