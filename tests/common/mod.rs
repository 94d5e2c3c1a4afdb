//! Shared integration test helpers for print-intent.
//!
//! This module provides canonical profile factories and a `TestContext`
//! that wires a registry, quality manager and machine manager into an
//! `IntentSelector`.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{TestContext, intent_profile, quality_profile};
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attributes
//! suppress warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use print_intent::config::{IntentSettings, ProfileMetadata, QualityGroup};
use print_intent::{
    ExtruderStack, InMemoryRegistry, IntentSelector, MachineManager, StaticQualityManager,
};
use std::sync::Arc;

pub const PRINTER: &str = "printerX";

/// An intent profile for `PRINTER`.
pub fn intent_profile(
    id: &str,
    category: &str,
    quality_type: &str,
    nozzle: &str,
    material: &str,
) -> ProfileMetadata {
    ProfileMetadata::new(id)
        .container_type("intent")
        .definition(PRINTER)
        .variant(nozzle)
        .material_id(material)
        .intent_category(category)
        .quality_type(quality_type)
}

/// A printer-level quality profile for `PRINTER`.
pub fn quality_profile(id: &str, quality_type: &str) -> ProfileMetadata {
    ProfileMetadata::new(id)
        .container_type("quality")
        .definition(PRINTER)
        .quality_type(quality_type)
}

/// Quality groups usable on the global stack, one per quality type.
pub fn applicable_groups(quality_types: &[&str]) -> Vec<QualityGroup> {
    quality_types
        .iter()
        .map(|qt| QualityGroup::new(*qt, *qt).for_global(format!("{PRINTER}_{qt}")))
        .collect()
}

/// The two-profile registry used by most scenarios: `a` is
/// default/normal and `b` is engineering/fine, both for noz1 + matA.
pub fn scenario_profiles() -> Vec<ProfileMetadata> {
    vec![
        intent_profile("a", "default", "normal", "noz1", "matA"),
        intent_profile("b", "engineering", "fine", "noz1", "matA"),
        quality_profile("q_normal", "normal"),
        quality_profile("q_fine", "fine"),
    ]
}

/// Collaborators plus the selector under test.
pub struct TestContext {
    pub registry: Arc<InMemoryRegistry>,
    pub machine: Arc<MachineManager>,
    pub selector: Arc<IntentSelector>,
}

impl TestContext {
    /// Build a context; the machine has no active printer yet.
    pub fn new(
        profiles: Vec<ProfileMetadata>,
        groups: Vec<QualityGroup>,
        default_quality_type: &str,
        settings: IntentSettings,
    ) -> Self {
        let registry = Arc::new(InMemoryRegistry::from_profiles(profiles));
        let machine = Arc::new(MachineManager::new());
        let quality_manager = Arc::new(
            StaticQualityManager::new(groups).with_default_quality_type(default_quality_type),
        );
        let selector = Arc::new(IntentSelector::new(
            registry.clone(),
            quality_manager,
            machine.clone(),
            settings,
        ));
        Self {
            registry,
            machine,
            selector,
        }
    }

    /// The standard scenario with normal + fine applicable and one extruder
    /// loaded with noz1 / matA.
    pub fn scenario() -> Self {
        let ctx = Self::new(
            scenario_profiles(),
            applicable_groups(&["normal", "fine"]),
            "normal",
            IntentSettings::default(),
        );
        ctx.machine
            .set_active_machine(PRINTER, vec![ExtruderStack::new(0, "noz1", "matA")]);
        ctx
    }
}
