//! Data model for print-intent.
//!
//! This crate holds the plain types shared between the intent selector and
//! the host application:
//!
//! - Profile metadata and registry search filters
//! - Shared profile handles assigned onto extruder stacks
//! - Intent pairs and quality groups
//! - Selector settings
//! - The typed error enum

pub mod container;
pub mod error;
pub mod filter;
pub mod intent;
pub mod metadata;
pub mod quality;
pub mod settings;

pub use container::{EMPTY_INTENT_ID, InstanceContainer};
pub use error::IntentError;
pub use filter::MetadataFilter;
pub use intent::{DEFAULT_INTENT_CATEGORY, Intent};
pub use metadata::{ProfileMetadata, container_types, keys};
pub use quality::QualityGroup;
pub use settings::IntentSettings;
