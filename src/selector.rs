//! Intent selection front-end.
//!
//! [`IntentSelector`] answers which intents exist for the active printer,
//! nozzle and material combination, and puts a default selection onto the
//! extruders when the active configuration changes.
//!
//! All queries read from the collaborators on every call; nothing is cached.

use crate::machine::{ExtruderStack, GlobalStack, MachineConfiguration};
use crate::notifier::{ConfigurationEvent, ConfigurationObserver, ObserverId};
use crate::quality_manager::QualityManager;
use crate::registry::ProfileRegistry;
use parking_lot::Mutex;
use print_intent_config::{
    DEFAULT_INTENT_CATEGORY, InstanceContainer, Intent, IntentError, IntentSettings,
    MetadataFilter, ProfileMetadata, container_types, keys,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Computes available intents and applies intent selections.
///
/// Constructed once by the host and shared behind an `Arc`. Call
/// [`IntentSelector::attach`] to have it react to configuration changes.
pub struct IntentSelector {
    registry: Arc<dyn ProfileRegistry>,
    quality_manager: Arc<dyn QualityManager>,
    machine: Arc<dyn MachineConfiguration>,
    settings: IntentSettings,
    /// Subscription on the machine's notifier while attached.
    subscription: Mutex<Option<ObserverId>>,
}

impl std::fmt::Debug for IntentSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentSelector")
            .field("settings", &self.settings)
            .field("subscription", &*self.subscription.lock())
            .finish_non_exhaustive()
    }
}

impl IntentSelector {
    pub fn new(
        registry: Arc<dyn ProfileRegistry>,
        quality_manager: Arc<dyn QualityManager>,
        machine: Arc<dyn MachineConfiguration>,
        settings: IntentSettings,
    ) -> Self {
        Self {
            registry,
            quality_manager,
            machine,
            settings,
            subscription: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &IntentSettings {
        &self.settings
    }

    /// Subscribe to the machine configuration's change notifications.
    ///
    /// Attaching twice keeps the first subscription.
    pub fn attach(self: &Arc<Self>) -> ObserverId {
        let mut subscription = self.subscription.lock();
        if let Some(id) = *subscription {
            return id;
        }
        let observer: Arc<dyn ConfigurationObserver> = self.clone();
        let id = self.machine.notifier().subscribe(&observer);
        *subscription = Some(id);
        id
    }

    /// Stop reacting to configuration changes.
    pub fn detach(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.machine.notifier().unsubscribe(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Metadata of all intent profiles for a printer, nozzle and material.
    ///
    /// Returns an empty list if nothing matches.
    pub fn intent_metadatas(
        &self,
        definition_id: &str,
        nozzle_name: &str,
        material_id: &str,
    ) -> Vec<ProfileMetadata> {
        let filter = MetadataFilter::new()
            .container_type(container_types::INTENT)
            .definition(definition_id)
            .variant(nozzle_name)
            .material_id(material_id);
        self.registry.find_metadata(&filter)
    }

    /// Intent categories declared for a configuration, always including
    /// `default`.
    pub fn intent_categories(
        &self,
        definition_id: &str,
        nozzle_id: &str,
        material_id: &str,
    ) -> BTreeSet<String> {
        let mut categories: BTreeSet<String> = self
            .intent_metadatas(definition_id, nozzle_id, material_id)
            .iter()
            .filter_map(|m| m.get_intent_category())
            .map(String::from)
            .collect();
        // The "no special intent" choice has no profile but is always offered.
        categories.insert(DEFAULT_INTENT_CATEGORY.to_string());
        categories
    }

    /// Intents selectable in the current configuration.
    ///
    /// Only quality types with a quality group usable on the global stack
    /// are offered. The union is taken over all used extruders; the actual
    /// profile behind a pair may differ per extruder.
    pub fn current_available_intents(&self) -> BTreeSet<Intent> {
        let Some(global) = self.machine.global_stack() else {
            return BTreeSet::new();
        };
        let extruders = self.machine.used_extruders();
        if extruders.is_empty() {
            return BTreeSet::new();
        }

        let available_quality_types: HashSet<String> = self
            .quality_manager
            .quality_groups(&global)
            .into_iter()
            .filter(|g| g.is_available_for_global())
            .map(|g| g.quality_type)
            .collect();

        let mut intent_ids: BTreeSet<String> = BTreeSet::new();
        for extruder in &extruders {
            intent_ids.extend(
                self.intent_metadatas(
                    &global.definition_id,
                    &extruder.nozzle_name,
                    &extruder.material_id,
                )
                .iter()
                .filter(|m| {
                    m.get_quality_type()
                        .is_some_and(|qt| available_quality_types.contains(qt))
                })
                .filter_map(|m| m.id().map(String::from)),
            );
        }

        let mut intents = BTreeSet::new();
        for id in &intent_ids {
            let Some(metadata) = self
                .registry
                .find_metadata(&MetadataFilter::new().id(id))
                .into_iter()
                .next()
            else {
                continue;
            };
            match (metadata.get_intent_category(), metadata.get_quality_type()) {
                (Some(category), Some(quality_type)) => {
                    intents.insert(Intent::new(category, quality_type));
                }
                _ => log::debug!("Intent profile '{}' has no intent category", id),
            }
        }
        log::debug!(
            "{} intent(s) available for '{}'",
            intents.len(),
            global.definition_id
        );
        intents
    }

    /// Intent categories available on any used extruder.
    ///
    /// Unlike [`current_available_intents`](Self::current_available_intents)
    /// this is not narrowed to quality types usable on the global stack: it
    /// lists every category the current nozzles and materials have.
    pub fn current_available_intent_categories(&self) -> BTreeSet<String> {
        let Some(global) = self.machine.global_stack() else {
            return BTreeSet::new();
        };
        let mut categories = BTreeSet::new();
        for extruder in self.machine.used_extruders() {
            categories.extend(self.intent_categories(
                &global.definition_id,
                &extruder.nozzle_name,
                &extruder.material_id,
            ));
        }
        categories
    }

    /// The intent to select when the user has not chosen one.
    ///
    /// In order of preference: `default` with the preferred quality type,
    /// any `default` pair, the first available pair, the empty intent.
    pub fn default_intent(&self) -> Intent {
        let available = self.current_available_intents();

        if let Some(quality_type) = self.preferred_quality_type() {
            let preferred = Intent::new(DEFAULT_INTENT_CATEGORY, quality_type);
            if available.contains(&preferred) {
                return preferred;
            }
        }
        if let Some(intent) = available.iter().find(|i| i.is_default_category()) {
            return intent.clone();
        }
        available.into_iter().next().unwrap_or_else(Intent::empty)
    }

    /// Put the intent and quality profiles for `category` / `quality_type` on
    /// every used extruder.
    ///
    /// Every extruder is resolved before any is written, so a failed lookup
    /// leaves the configuration untouched. This includes a pair that only
    /// some extruders offer: available intents are a union over extruders,
    /// and selecting such a pair fails with [`IntentError::NoIntentProfile`]
    /// for the first extruder lacking it, with no extruder changed.
    pub fn select_intent(&self, category: &str, quality_type: &str) -> Result<(), IntentError> {
        let global = self
            .machine
            .global_stack()
            .ok_or(IntentError::NoActiveMachine)?;

        let resolved = self
            .machine
            .used_extruders()
            .iter()
            .map(|extruder| {
                let intent = self.find_intent(&global, extruder, category, quality_type)?;
                let quality = self.find_quality(&global, extruder, quality_type)?;
                Ok((extruder.position, intent, quality))
            })
            .collect::<Result<Vec<_>, IntentError>>()?;

        let count = resolved.len();
        for (position, intent, quality) in resolved {
            self.machine.assign_intent(position, intent)?;
            self.machine.assign_quality(position, quality)?;
        }
        log::info!(
            "Selected intent {}/{} on {} extruder(s)",
            category,
            quality_type,
            count
        );
        Ok(())
    }

    /// Compute [`default_intent`](Self::default_intent) and select it.
    ///
    /// Returns the applied pair. When no intent is available the empty
    /// intent is returned and the extruders are reset with
    /// [`clear_selection`](Self::clear_selection).
    pub fn select_default_intent(&self) -> Result<Intent, IntentError> {
        let intent = self.default_intent();
        if intent.is_empty() {
            self.clear_selection()?;
            return Ok(intent);
        }
        self.select_intent(&intent.category, &intent.quality_type)?;
        Ok(intent)
    }

    /// Put the empty intent on every used extruder and remove its quality.
    pub fn clear_selection(&self) -> Result<(), IntentError> {
        let extruders = self.machine.used_extruders();
        for extruder in &extruders {
            self.machine
                .assign_intent(extruder.position, InstanceContainer::empty_intent())?;
            self.machine.clear_quality(extruder.position)?;
        }
        log::info!("Cleared intent selection on {} extruder(s)", extruders.len());
        Ok(())
    }

    /// The pair currently assigned to the first used extruder.
    ///
    /// An extruder without a quality profile reports [`Intent::empty`].
    /// `None` only when no extruder is in use.
    pub fn current_intent(&self) -> Option<Intent> {
        let extruder = self.machine.used_extruders().into_iter().next()?;
        let Some(quality_type) = extruder
            .quality
            .as_ref()
            .and_then(|q| q.metadata().get_quality_type())
        else {
            return Some(Intent::empty());
        };
        let category = extruder
            .intent
            .as_ref()
            .and_then(|i| i.metadata().get_intent_category())
            .unwrap_or(DEFAULT_INTENT_CATEGORY);
        Some(Intent::new(category, quality_type))
    }

    fn preferred_quality_type(&self) -> Option<String> {
        if let Some(quality_type) = &self.settings.preferred_quality_type {
            return Some(quality_type.clone());
        }
        let global = self.machine.global_stack()?;
        self.quality_manager
            .default_quality_group(&global)
            .map(|g| g.quality_type)
    }

    fn find_intent(
        &self,
        global: &GlobalStack,
        extruder: &ExtruderStack,
        category: &str,
        quality_type: &str,
    ) -> Result<InstanceContainer, IntentError> {
        let filter = MetadataFilter::new()
            .container_type(container_types::INTENT)
            .definition(&global.definition_id)
            .variant(&extruder.nozzle_name)
            .material_id(&extruder.material_id)
            .intent_category(category)
            .quality_type(quality_type);
        if let Some(intent) = self.registry.find_containers(&filter).into_iter().next() {
            return Ok(intent);
        }
        if category == DEFAULT_INTENT_CATEGORY {
            return Ok(InstanceContainer::empty_intent());
        }
        Err(IntentError::NoIntentProfile {
            definition: global.definition_id.clone(),
            variant: extruder.nozzle_name.clone(),
            material: extruder.material_id.clone(),
            category: category.to_string(),
            quality_type: quality_type.to_string(),
        })
    }

    /// First quality profile of `quality_type` for the current printer or
    /// no printer, preferring the closest match on definition, then nozzle,
    /// then material.
    fn find_quality(
        &self,
        global: &GlobalStack,
        extruder: &ExtruderStack,
        quality_type: &str,
    ) -> Result<InstanceContainer, IntentError> {
        let filter = MetadataFilter::new()
            .container_type(container_types::QUALITY)
            .quality_type(quality_type);
        // Profiles bound to another printer are never candidates; generic
        // profiles (no definition) are.
        let rank = |container: &InstanceContainer| {
            let meta = container.metadata();
            let mut rank = 0u8;
            match meta.get_definition() {
                Some(definition) if definition == global.definition_id => rank += 4,
                Some(_) => return None,
                None => {}
            }
            if meta.get_str(keys::VARIANT) == Some(extruder.nozzle_name.as_str()) {
                rank += 2;
            }
            if meta.get_str(keys::MATERIAL_ID) == Some(extruder.material_id.as_str()) {
                rank += 1;
            }
            Some(rank)
        };

        let mut best: Option<(u8, InstanceContainer)> = None;
        for candidate in self.registry.find_containers(&filter) {
            let Some(candidate_rank) = rank(&candidate) else {
                log::trace!("Skipping quality '{}' of another printer", candidate.id());
                continue;
            };
            if best.as_ref().is_none_or(|(r, _)| candidate_rank > *r) {
                best = Some((candidate_rank, candidate));
            }
        }
        best.map(|(_, container)| container)
            .ok_or_else(|| IntentError::NoQualityProfile {
                quality_type: quality_type.to_string(),
            })
    }
}

impl ConfigurationObserver for IntentSelector {
    fn on_event(&self, event: &ConfigurationEvent) {
        match event {
            ConfigurationEvent::ActiveStackChanged if self.settings.auto_select_default => {
                match self.select_default_intent() {
                    Ok(intent) => log::info!("Applied default intent {}", intent),
                    Err(e) => log::warn!("Failed to apply default intent: {}", e),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MachineManager;
    use crate::quality_manager::StaticQualityManager;
    use crate::registry::InMemoryRegistry;
    use print_intent_config::QualityGroup;

    fn intent(id: &str, category: &str, quality_type: &str) -> ProfileMetadata {
        ProfileMetadata::new(id)
            .container_type("intent")
            .definition("printerX")
            .variant("noz1")
            .material_id("matA")
            .intent_category(category)
            .quality_type(quality_type)
    }

    fn quality(id: &str, quality_type: &str) -> ProfileMetadata {
        ProfileMetadata::new(id)
            .container_type("quality")
            .definition("printerX")
            .quality_type(quality_type)
    }

    fn selector(
        profiles: Vec<ProfileMetadata>,
        groups: Vec<QualityGroup>,
        extruders: Vec<ExtruderStack>,
    ) -> (IntentSelector, Arc<MachineManager>) {
        let machine = Arc::new(MachineManager::new());
        machine.set_active_machine("printerX", extruders);
        let selector = IntentSelector::new(
            Arc::new(InMemoryRegistry::from_profiles(profiles)),
            Arc::new(StaticQualityManager::new(groups).with_default_quality_type("normal")),
            machine.clone(),
            IntentSettings::default(),
        );
        (selector, machine)
    }

    #[test]
    fn test_intent_metadatas_ignores_quality_profiles() {
        let (selector, _) = selector(
            vec![
                intent("a", "default", "normal"),
                quality("q", "normal").variant("noz1").material_id("matA"),
            ],
            vec![],
            vec![],
        );
        let found = selector.intent_metadatas("printerX", "noz1", "matA");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), Some("a"));
    }

    #[test]
    fn test_categories_skip_profiles_without_category() {
        let (selector, _) = selector(
            vec![
                ProfileMetadata::new("x")
                    .container_type("intent")
                    .definition("printerX")
                    .variant("noz1")
                    .material_id("matA"),
            ],
            vec![],
            vec![],
        );
        let categories = selector.intent_categories("printerX", "noz1", "matA");
        assert_eq!(categories, BTreeSet::from(["default".to_string()]));
    }

    #[test]
    fn test_no_global_stack_yields_nothing() {
        let machine = Arc::new(MachineManager::new());
        let selector = IntentSelector::new(
            Arc::new(InMemoryRegistry::from_profiles([intent("a", "default", "normal")])),
            Arc::new(StaticQualityManager::default()),
            machine,
            IntentSettings::default(),
        );
        assert!(selector.current_available_intents().is_empty());
        assert!(selector.current_available_intent_categories().is_empty());
        assert!(selector.default_intent().is_empty());
        assert!(matches!(
            selector.select_intent("default", "normal"),
            Err(IntentError::NoActiveMachine)
        ));
        assert!(selector.current_intent().is_none());
    }

    #[test]
    fn test_quality_prefers_closest_match() {
        let (selector, machine) = selector(
            vec![
                ProfileMetadata::new("generic_fine")
                    .container_type("quality")
                    .quality_type("fine"),
                quality("printer_fine", "fine"),
                quality("nozzle_fine", "fine").variant("noz1"),
                intent("b", "engineering", "fine"),
            ],
            vec![QualityGroup::new("Fine", "fine").for_global("printer_fine")],
            vec![ExtruderStack::new(0, "noz1", "matA")],
        );
        selector.select_intent("engineering", "fine").expect("select");
        let extruder = machine.extruder(0).expect("extruder 0");
        assert_eq!(extruder.quality.expect("quality").id(), "nozzle_fine");
        assert_eq!(extruder.intent.expect("intent").id(), "b");
    }

    #[test]
    fn test_quality_skips_other_printers() {
        let (selector, machine) = selector(
            vec![
                ProfileMetadata::new("printerY_noz1_normal")
                    .container_type("quality")
                    .definition("printerY")
                    .variant("noz1")
                    .quality_type("normal"),
                ProfileMetadata::new("generic_normal")
                    .container_type("quality")
                    .quality_type("normal"),
                intent("a", "default", "normal"),
            ],
            vec![QualityGroup::new("Normal", "normal").for_global("generic_normal")],
            vec![ExtruderStack::new(0, "noz1", "matA")],
        );
        selector.select_intent("default", "normal").expect("select");
        let extruder = machine.extruder(0).expect("extruder 0");
        assert_eq!(extruder.quality.expect("quality").id(), "generic_normal");
    }

    #[test]
    fn test_quality_of_other_printer_only_is_an_error() {
        let (selector, machine) = selector(
            vec![
                ProfileMetadata::new("printerY_normal")
                    .container_type("quality")
                    .definition("printerY")
                    .quality_type("normal"),
                intent("a", "default", "normal"),
            ],
            vec![],
            vec![ExtruderStack::new(0, "noz1", "matA")],
        );
        assert!(matches!(
            selector.select_intent("default", "normal"),
            Err(IntentError::NoQualityProfile { .. })
        ));
        assert!(machine.extruder(0).expect("extruder 0").quality.is_none());
    }

    #[test]
    fn test_default_category_without_profile_uses_empty_intent() {
        let (selector, machine) = selector(
            vec![quality("printer_normal", "normal")],
            vec![QualityGroup::new("Normal", "normal").for_global("printer_normal")],
            vec![ExtruderStack::new(0, "noz1", "matA")],
        );
        selector.select_intent("default", "normal").expect("select");
        let extruder = machine.extruder(0).expect("extruder 0");
        assert!(extruder.intent.expect("intent").is_empty_intent());
        assert_eq!(
            selector.current_intent(),
            Some(Intent::new("default", "normal"))
        );
    }

    #[test]
    fn test_failed_lookup_leaves_extruders_untouched() {
        let (selector, machine) = selector(
            vec![
                intent("b", "engineering", "fine"),
                quality("printer_fine", "fine"),
            ],
            vec![],
            vec![
                ExtruderStack::new(0, "noz1", "matA"),
                ExtruderStack::new(1, "noz1", "matB"),
            ],
        );
        let err = selector
            .select_intent("engineering", "fine")
            .expect_err("extruder 1 has no engineering profile");
        match err {
            IntentError::NoIntentProfile {
                material, category, ..
            } => {
                assert_eq!(material, "matB");
                assert_eq!(category, "engineering");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(machine.extruder(0).expect("extruder 0").intent.is_none());
    }

    #[test]
    fn test_clear_selection_reports_empty_intent() {
        let (selector, machine) = selector(
            vec![intent("a", "default", "normal"), quality("printer_normal", "normal")],
            vec![QualityGroup::new("Normal", "normal").for_global("printer_normal")],
            vec![ExtruderStack::new(0, "noz1", "matA")],
        );
        selector.select_intent("default", "normal").expect("select");
        selector.clear_selection().expect("clear");

        let extruder = machine.extruder(0).expect("extruder 0");
        assert!(extruder.intent.expect("intent").is_empty_intent());
        assert!(extruder.quality.is_none());
        assert_eq!(selector.current_intent(), Some(Intent::empty()));
    }

    #[test]
    fn test_missing_quality_profile_is_an_error() {
        let (selector, _) = selector(
            vec![intent("b", "engineering", "fine")],
            vec![],
            vec![ExtruderStack::new(0, "noz1", "matA")],
        );
        assert!(matches!(
            selector.select_intent("engineering", "fine"),
            Err(IntentError::NoQualityProfile { quality_type }) if quality_type == "fine"
        ));
    }

    #[test]
    fn test_preferred_quality_type_setting_overrides_manager_default() {
        let machine = Arc::new(MachineManager::new());
        machine.set_active_machine("printerX", vec![ExtruderStack::new(0, "noz1", "matA")]);
        let selector = IntentSelector::new(
            Arc::new(InMemoryRegistry::from_profiles([
                intent("a", "default", "normal"),
                intent("c", "default", "fine"),
            ])),
            Arc::new(
                StaticQualityManager::new(vec![
                    QualityGroup::new("Normal", "normal").for_global("gn"),
                    QualityGroup::new("Fine", "fine").for_global("gf"),
                ])
                .with_default_quality_type("normal"),
            ),
            machine,
            IntentSettings::default().with_preferred_quality_type("fine"),
        );
        assert_eq!(selector.default_intent(), Intent::new("default", "fine"));
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (selector, machine) = selector(vec![], vec![], vec![]);
        let selector = Arc::new(selector);
        let first = selector.attach();
        let second = selector.attach();
        assert_eq!(first, second);
        assert!(selector.is_attached());
        assert_eq!(machine.notifier().observer_count(), 1);

        selector.detach();
        assert!(!selector.is_attached());
        assert_eq!(machine.notifier().observer_count(), 0);
    }
}
