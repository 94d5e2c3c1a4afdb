//! Quality groups as reported by the quality manager.

use serde::{Deserialize, Serialize};

/// A set of quality profiles sharing one quality type.
///
/// `global_profile_id` is the id of the profile that makes this group usable
/// with the current global stack. A group without one exists for the printer
/// but cannot be selected in the current configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGroup {
    /// Display name (e.g. "Normal")
    pub name: String,

    /// Quality type shared by the group's profiles (e.g. "normal")
    pub quality_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_profile_id: Option<String>,
}

impl QualityGroup {
    pub fn new(name: impl Into<String>, quality_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quality_type: quality_type.into(),
            global_profile_id: None,
        }
    }

    /// Builder method to mark the group applicable to the global stack
    pub fn for_global(mut self, profile_id: impl Into<String>) -> Self {
        self.global_profile_id = Some(profile_id.into());
        self
    }

    pub fn is_available_for_global(&self) -> bool {
        self.global_profile_id.is_some()
    }
}
