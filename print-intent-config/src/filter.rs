//! Registry search filters.

use crate::metadata::{ProfileMetadata, keys};

/// Conjunction of `key == value` constraints over profile metadata.
///
/// An empty filter matches every profile. A constrained key that is missing
/// from the metadata, or holds a non-string value, never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    constraints: Vec<(String, String)>,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint. A later constraint on the same key replaces the earlier one.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.constraints.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.constraints.push((key, value));
        }
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.with(keys::ID, id)
    }

    pub fn container_type(self, kind: &str) -> Self {
        self.with(keys::TYPE, kind)
    }

    pub fn definition(self, definition: &str) -> Self {
        self.with(keys::DEFINITION, definition)
    }

    pub fn variant(self, variant: &str) -> Self {
        self.with(keys::VARIANT, variant)
    }

    pub fn material_id(self, material_id: &str) -> Self {
        self.with(keys::MATERIAL_ID, material_id)
    }

    pub fn quality_type(self, quality_type: &str) -> Self {
        self.with(keys::QUALITY_TYPE, quality_type)
    }

    pub fn intent_category(self, category: &str) -> Self {
        self.with(keys::INTENT_CATEGORY, category)
    }

    /// The constrained value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.constraints
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Check whether `metadata` satisfies every constraint.
    pub fn matches(&self, metadata: &ProfileMetadata) -> bool {
        self.constraints
            .iter()
            .all(|(key, value)| metadata.get_str(key) == Some(value.as_str()))
    }
}
