//! Shared handles to registry profiles.

use crate::intent::DEFAULT_INTENT_CATEGORY;
use crate::metadata::{ProfileMetadata, container_types};
use std::sync::Arc;

/// Id of the intent container that stands for "no special intent".
pub const EMPTY_INTENT_ID: &str = "empty_intent";

/// A profile as handed out by the registry and assigned onto extruder stacks.
///
/// Cloning is cheap: the metadata is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceContainer {
    metadata: Arc<ProfileMetadata>,
}

impl InstanceContainer {
    pub fn new(metadata: ProfileMetadata) -> Self {
        Self {
            metadata: Arc::new(metadata),
        }
    }

    /// The intent container used when the `default` category has no profile
    /// of its own for a configuration.
    pub fn empty_intent() -> Self {
        Self::new(
            ProfileMetadata::new(EMPTY_INTENT_ID)
                .container_type(container_types::INTENT)
                .intent_category(DEFAULT_INTENT_CATEGORY),
        )
    }

    pub fn id(&self) -> &str {
        self.metadata.id().unwrap_or_default()
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    /// Check whether this is the "no special intent" container
    pub fn is_empty_intent(&self) -> bool {
        self.id() == EMPTY_INTENT_ID
    }
}

impl From<ProfileMetadata> for InstanceContainer {
    fn from(metadata: ProfileMetadata) -> Self {
        Self::new(metadata)
    }
}
