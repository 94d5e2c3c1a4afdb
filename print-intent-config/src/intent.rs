//! Intent selection pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The synthetic category meaning "no special intent". It is offered for
/// every configuration whether or not a profile declares it.
pub const DEFAULT_INTENT_CATEGORY: &str = "default";

/// A chosen preset: an intent category together with a quality type.
///
/// Ordering is lexicographic by category, then quality type. That order is
/// what makes "the first available intent" well defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Intent {
    pub category: String,
    pub quality_type: String,
}

impl Intent {
    pub fn new(category: impl Into<String>, quality_type: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            quality_type: quality_type.into(),
        }
    }

    /// The sentinel returned when no intent is available at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_empty() && self.quality_type.is_empty()
    }

    /// Check whether this pair belongs to the `default` category
    pub fn is_default_category(&self) -> bool {
        self.category == DEFAULT_INTENT_CATEGORY
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<empty intent>")
        } else {
            write!(f, "{}/{}", self.category, self.quality_type)
        }
    }
}

impl<C: Into<String>, Q: Into<String>> From<(C, Q)> for Intent {
    fn from((category, quality_type): (C, Q)) -> Self {
        Self::new(category, quality_type)
    }
}
