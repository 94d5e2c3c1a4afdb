//! Quality manager contract and a fixed-table implementation.

use crate::machine::GlobalStack;
use print_intent_config::QualityGroup;

/// Source of quality groups for a printer configuration.
pub trait QualityManager: Send + Sync {
    /// Quality groups known for the printer of `global`. Groups not usable
    /// with the global stack are included, without a global profile.
    fn quality_groups(&self, global: &GlobalStack) -> Vec<QualityGroup>;

    /// The group the printer prefers when nothing else is chosen.
    fn default_quality_group(&self, global: &GlobalStack) -> Option<QualityGroup>;
}

/// Quality manager backed by a fixed list of groups.
#[derive(Debug, Clone, Default)]
pub struct StaticQualityManager {
    groups: Vec<QualityGroup>,
    default_quality_type: Option<String>,
}

impl StaticQualityManager {
    pub fn new(groups: Vec<QualityGroup>) -> Self {
        Self {
            groups,
            default_quality_type: None,
        }
    }

    /// Builder method to set the default quality type
    pub fn with_default_quality_type(mut self, quality_type: impl Into<String>) -> Self {
        self.default_quality_type = Some(quality_type.into());
        self
    }
}

impl QualityManager for StaticQualityManager {
    fn quality_groups(&self, _global: &GlobalStack) -> Vec<QualityGroup> {
        self.groups.clone()
    }

    fn default_quality_group(&self, _global: &GlobalStack) -> Option<QualityGroup> {
        let wanted = self.default_quality_type.as_deref()?;
        self.groups
            .iter()
            .find(|g| g.quality_type == wanted)
            .cloned()
    }
}
