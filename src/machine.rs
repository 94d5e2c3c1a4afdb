//! Machine and extruder configuration.
//!
//! [`MachineConfiguration`] is what the intent selector needs from the host:
//! the active printer definition, the extruders in use, a way to assign the
//! chosen profiles, and the change notifications. [`MachineManager`] is an
//! in-memory implementation the host can drive directly.

use crate::notifier::{ChangeNotifier, ConfigurationEvent};
use parking_lot::RwLock;
use print_intent_config::{InstanceContainer, IntentError};

/// Printer-wide configuration state.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStack {
    /// Id of the printer definition (e.g. "ultimaker3")
    pub definition_id: String,
}

impl GlobalStack {
    pub fn new(definition_id: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
        }
    }
}

/// Configuration state of one print head.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtruderStack {
    /// Extruder position on the printer, starting at 0
    pub position: usize,

    /// Name of the installed nozzle variant
    pub nozzle_name: String,

    /// Base id of the loaded material
    pub material_id: String,

    /// Whether the extruder takes part in the print
    pub enabled: bool,

    /// Assigned intent profile
    pub intent: Option<InstanceContainer>,

    /// Assigned quality profile
    pub quality: Option<InstanceContainer>,
}

impl ExtruderStack {
    pub fn new(
        position: usize,
        nozzle_name: impl Into<String>,
        material_id: impl Into<String>,
    ) -> Self {
        Self {
            position,
            nozzle_name: nozzle_name.into(),
            material_id: material_id.into(),
            enabled: true,
            intent: None,
            quality: None,
        }
    }

    /// Builder method to set whether the extruder is enabled
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The host's view of the active machine, as seen by the intent selector.
pub trait MachineConfiguration: Send + Sync {
    /// The global stack, or `None` when no printer is active.
    fn global_stack(&self) -> Option<GlobalStack>;

    /// Extruders taking part in the print, ordered by position.
    fn used_extruders(&self) -> Vec<ExtruderStack>;

    /// Put `intent` on the extruder at `position`.
    fn assign_intent(
        &self,
        position: usize,
        intent: InstanceContainer,
    ) -> Result<(), IntentError>;

    /// Put `quality` on the extruder at `position`.
    fn assign_quality(
        &self,
        position: usize,
        quality: InstanceContainer,
    ) -> Result<(), IntentError>;

    /// Remove the quality profile from the extruder at `position`.
    fn clear_quality(&self, position: usize) -> Result<(), IntentError>;

    /// Channel on which configuration changes are published.
    fn notifier(&self) -> &ChangeNotifier;
}

#[derive(Debug, Default)]
struct MachineState {
    global: Option<GlobalStack>,
    extruders: Vec<ExtruderStack>,
}

/// In-memory machine configuration.
///
/// Host-facing mutators publish [`ConfigurationEvent::ActiveStackChanged`]
/// once the state lock has been released, so observers can read the new
/// state and write their selection back.
#[derive(Debug, Default)]
pub struct MachineManager {
    state: RwLock<MachineState>,
    notifier: ChangeNotifier,
}

impl MachineManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `definition_id` the active printer with the given extruders.
    pub fn set_active_machine(&self, definition_id: &str, mut extruders: Vec<ExtruderStack>) {
        extruders.sort_by_key(|e| e.position);
        {
            let mut state = self.state.write();
            state.global = Some(GlobalStack::new(definition_id));
            state.extruders = extruders;
        }
        log::info!("Active machine changed to '{}'", definition_id);
        self.notifier.notify(&ConfigurationEvent::ActiveStackChanged);
    }

    /// Replace the extruders of the active printer.
    pub fn set_extruders(&self, mut extruders: Vec<ExtruderStack>) {
        extruders.sort_by_key(|e| e.position);
        let count = extruders.len();
        {
            let mut state = self.state.write();
            state.extruders = extruders;
        }
        log::info!("Extruders replaced ({} extruder(s))", count);
        self.notifier.notify(&ConfigurationEvent::ActiveStackChanged);
    }

    /// Deactivate the current printer.
    pub fn clear_active_machine(&self) {
        {
            let mut state = self.state.write();
            state.global = None;
            state.extruders.clear();
        }
        log::info!("Active machine cleared");
        self.notifier.notify(&ConfigurationEvent::ActiveStackChanged);
    }

    /// Change the material loaded in the extruder at `position`.
    pub fn set_extruder_material(
        &self,
        position: usize,
        material_id: &str,
    ) -> Result<(), IntentError> {
        self.update_extruder(position, |e| e.material_id = material_id.to_string())?;
        log::info!("Extruder {} material changed to '{}'", position, material_id);
        self.notifier.notify(&ConfigurationEvent::ActiveStackChanged);
        Ok(())
    }

    /// Change the nozzle installed in the extruder at `position`.
    pub fn set_extruder_nozzle(
        &self,
        position: usize,
        nozzle_name: &str,
    ) -> Result<(), IntentError> {
        self.update_extruder(position, |e| e.nozzle_name = nozzle_name.to_string())?;
        log::info!("Extruder {} nozzle changed to '{}'", position, nozzle_name);
        self.notifier.notify(&ConfigurationEvent::ActiveStackChanged);
        Ok(())
    }

    /// Enable or disable the extruder at `position`.
    pub fn set_extruder_enabled(&self, position: usize, enabled: bool) -> Result<(), IntentError> {
        self.update_extruder(position, |e| e.enabled = enabled)?;
        log::info!(
            "Extruder {} {}",
            position,
            if enabled { "enabled" } else { "disabled" }
        );
        self.notifier.notify(&ConfigurationEvent::ActiveStackChanged);
        Ok(())
    }

    /// Snapshot of the extruder at `position`, used or not.
    pub fn extruder(&self, position: usize) -> Option<ExtruderStack> {
        self.state
            .read()
            .extruders
            .iter()
            .find(|e| e.position == position)
            .cloned()
    }

    /// Snapshot of every extruder, used or not.
    pub fn extruders(&self) -> Vec<ExtruderStack> {
        self.state.read().extruders.clone()
    }

    fn update_extruder(
        &self,
        position: usize,
        update: impl FnOnce(&mut ExtruderStack),
    ) -> Result<(), IntentError> {
        let mut state = self.state.write();
        let extruder = state
            .extruders
            .iter_mut()
            .find(|e| e.position == position)
            .ok_or(IntentError::UnknownExtruder(position))?;
        update(extruder);
        Ok(())
    }
}

impl MachineConfiguration for MachineManager {
    fn global_stack(&self) -> Option<GlobalStack> {
        self.state.read().global.clone()
    }

    fn used_extruders(&self) -> Vec<ExtruderStack> {
        self.state
            .read()
            .extruders
            .iter()
            .filter(|e| e.enabled)
            .cloned()
            .collect()
    }

    fn assign_intent(
        &self,
        position: usize,
        intent: InstanceContainer,
    ) -> Result<(), IntentError> {
        log::debug!("Extruder {} intent -> '{}'", position, intent.id());
        self.update_extruder(position, |e| e.intent = Some(intent))?;
        self.notifier.notify(&ConfigurationEvent::SelectionChanged { position });
        Ok(())
    }

    fn assign_quality(
        &self,
        position: usize,
        quality: InstanceContainer,
    ) -> Result<(), IntentError> {
        log::debug!("Extruder {} quality -> '{}'", position, quality.id());
        self.update_extruder(position, |e| e.quality = Some(quality))?;
        self.notifier.notify(&ConfigurationEvent::SelectionChanged { position });
        Ok(())
    }

    fn clear_quality(&self, position: usize) -> Result<(), IntentError> {
        log::debug!("Extruder {} quality cleared", position);
        self.update_extruder(position, |e| e.quality = None)?;
        self.notifier.notify(&ConfigurationEvent::SelectionChanged { position });
        Ok(())
    }

    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}
