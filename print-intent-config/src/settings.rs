//! Selector settings.
//!
//! These are read from the host application's configuration. Every field
//! has a default, so an empty document yields [`IntentSettings::default`].

use crate::error::IntentError;
use serde::{Deserialize, Serialize};

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// Behaviour switches for the intent selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSettings {
    /// Apply the default intent whenever the active configuration changes
    /// (default: true)
    #[serde(default = "default_true")]
    pub auto_select_default: bool,

    /// Quality type preferred for the `default` category. When unset, the
    /// quality manager's default quality type is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_quality_type: Option<String>,
}

impl Default for IntentSettings {
    fn default() -> Self {
        Self {
            auto_select_default: default_true(),
            preferred_quality_type: None,
        }
    }
}

impl IntentSettings {
    /// Parse settings from a YAML fragment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, IntentError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml_ng::from_str(yaml)?;
        log::debug!("Loaded intent settings: {:?}", settings);
        Ok(settings)
    }

    /// Builder method to set the preferred quality type
    pub fn with_preferred_quality_type(mut self, quality_type: impl Into<String>) -> Self {
        self.preferred_quality_type = Some(quality_type.into());
        self
    }

    /// Builder method to enable or disable reacting to configuration changes
    pub fn with_auto_select_default(mut self, enabled: bool) -> Self {
        self.auto_select_default = enabled;
        self
    }
}
