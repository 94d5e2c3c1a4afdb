//! Typed error variants for the print-intent crates.
//!
//! Lookups that find nothing are not errors: queries return empty
//! collections. These variants only cover the paths that must produce
//! something, namely applying a selection to the extruders and parsing
//! settings.

use thiserror::Error;

/// Errors produced while applying an intent selection or loading settings.
///
/// # Example
///
/// ```rust
/// use print_intent_config::IntentError;
///
/// fn describe(e: &IntentError) -> &'static str {
///     match e {
///         IntentError::NoActiveMachine => "no printer",
///         IntentError::NoIntentProfile { .. } => "missing intent profile",
///         IntentError::NoQualityProfile { .. } => "missing quality profile",
///         IntentError::UnknownExtruder(_) => "bad extruder",
///         IntentError::InvalidSettings(_) => "bad settings",
///     }
/// }
///
/// assert_eq!(describe(&IntentError::NoActiveMachine), "no printer");
/// ```
#[derive(Debug, Error)]
pub enum IntentError {
    /// There is no global stack, so there is no printer definition to query.
    #[error("no active machine: the global stack is not set")]
    NoActiveMachine,

    /// The registry has no intent profile for an extruder's configuration.
    #[error(
        "no intent profile '{category}' ({quality_type}) for definition '{definition}', \
         variant '{variant}', material '{material}'"
    )]
    NoIntentProfile {
        /// Printer definition id.
        definition: String,
        /// Nozzle (variant) name of the extruder.
        variant: String,
        /// Material id loaded in the extruder.
        material: String,
        /// Requested intent category.
        category: String,
        /// Requested quality type.
        quality_type: String,
    },

    /// The registry has no quality profile with the requested quality type.
    #[error("no quality profile with quality type '{quality_type}'")]
    NoQualityProfile {
        /// Requested quality type.
        quality_type: String,
    },

    /// An extruder position that the machine configuration does not have.
    #[error("unknown extruder position {0}")]
    UnknownExtruder(usize),

    /// The settings YAML could not be parsed.
    #[error("invalid intent settings: {0}")]
    InvalidSettings(#[from] serde_yaml_ng::Error),
}
