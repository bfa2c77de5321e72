//! Container hierarchy boundary.

use crate::StoreResult;
use datascope_core::{EntityId, EntityType};
use std::collections::HashMap;

/// Bulk read access to a parent-pointer container hierarchy.
pub trait HierarchyStore: Send + Sync {
    /// The full parent→children adjacency for one entity type, returned in
    /// one read so expansion never degenerates into per-node queries.
    ///
    /// Entity types with no hierarchy return an empty map.
    fn adjacency(&self, entity_type: &EntityType)
        -> StoreResult<HashMap<EntityId, Vec<EntityId>>>;
}
