//! Profile registry contract and an in-memory implementation.

use parking_lot::RwLock;
use print_intent_config::{InstanceContainer, MetadataFilter, ProfileMetadata};

/// Read access to the host application's profile registry.
///
/// Searches that match nothing return an empty `Vec`; they never fail.
pub trait ProfileRegistry: Send + Sync {
    /// Metadata of every profile matching `filter`, in registry order.
    fn find_metadata(&self, filter: &MetadataFilter) -> Vec<ProfileMetadata>;

    /// Every profile matching `filter`, in registry order.
    fn find_containers(&self, filter: &MetadataFilter) -> Vec<InstanceContainer>;
}

/// Insertion-ordered registry held in memory.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    containers: RwLock<Vec<InstanceContainer>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a list of profiles
    pub fn from_profiles(profiles: impl IntoIterator<Item = ProfileMetadata>) -> Self {
        let registry = Self::new();
        for profile in profiles {
            registry.add(profile);
        }
        registry
    }

    /// Add a profile. A profile with the same id is replaced in place.
    pub fn add(&self, metadata: ProfileMetadata) {
        let container = InstanceContainer::new(metadata);
        let mut containers = self.containers.write();
        match containers
            .iter_mut()
            .find(|c| !container.id().is_empty() && c.id() == container.id())
        {
            Some(existing) => {
                log::debug!("Replacing profile '{}'", container.id());
                *existing = container;
            }
            None => {
                log::debug!("Adding profile '{}'", container.id());
                containers.push(container);
            }
        }
    }

    /// Remove a profile by id
    pub fn remove(&self, id: &str) -> Option<InstanceContainer> {
        let mut containers = self.containers.write();
        let pos = containers.iter().position(|c| c.id() == id)?;
        Some(containers.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.containers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.read().is_empty()
    }
}

impl ProfileRegistry for InMemoryRegistry {
    fn find_metadata(&self, filter: &MetadataFilter) -> Vec<ProfileMetadata> {
        self.containers
            .read()
            .iter()
            .filter(|c| filter.matches(c.metadata()))
            .map(|c| c.metadata().clone())
            .collect()
    }

    fn find_containers(&self, filter: &MetadataFilter) -> Vec<InstanceContainer> {
        self.containers
            .read()
            .iter()
            .filter(|c| filter.matches(c.metadata()))
            .cloned()
            .collect()
    }
}
