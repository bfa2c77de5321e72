//! Registry of entity-type metadata.

use datascope_core::{EntityDescriptor, EntityType};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Entity descriptors registered at startup.
///
/// Unregistered entity types are treated as not tracking a creator
/// attribute, so SELF-class resolution contributes nothing for them rather
/// than guessing at an attribute name.
#[derive(Debug, Default)]
pub struct EntityCatalog {
    descriptors: RwLock<HashMap<EntityType, EntityDescriptor>>,
}

impl EntityCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a descriptor.
    pub fn register(&self, descriptor: EntityDescriptor) {
        self.descriptors
            .write()
            .insert(descriptor.entity_type.clone(), descriptor);
    }

    /// Returns the descriptor for an entity type, if registered.
    pub fn descriptor(&self, entity_type: &EntityType) -> Option<EntityDescriptor> {
        self.descriptors.read().get(entity_type).cloned()
    }

    /// Whether rows of this type carry a created-by attribute.
    pub fn tracks_creator(&self, entity_type: &EntityType) -> bool {
        self.descriptors
            .read()
            .get(entity_type)
            .is_some_and(|descriptor| descriptor.tracks_creator)
    }
}
