//! Container hierarchy expansion.

use crate::EngineResult;
use datascope_core::{EntityId, EntityType};
use datascope_store::HierarchyStore;
use lru::LruCache;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ExpandKey {
    entity_type: EntityType,
    seeds: Vec<EntityId>,
    include_seeds: bool,
}

/// Breadth-first descendant expansion over a parent-pointer hierarchy.
///
/// Reads the full adjacency for one entity type in a single bulk call,
/// then expands iteratively; the visited set guards termination even if
/// the stored data were to contain a cycle. Results are memoized in a
/// bounded LRU keyed by (entity type, sorted seeds, self-inclusion) and
/// must be explicitly invalidated on hierarchy mutation; the hierarchy
/// changes rarely relative to read volume.
pub struct HierarchyExpander {
    store: Arc<dyn HierarchyStore>,
    memo: RwLock<LruCache<ExpandKey, HashSet<EntityId>>>,
}

impl HierarchyExpander {
    /// Creates an expander memoizing up to `capacity` expansions.
    pub fn new(store: Arc<dyn HierarchyStore>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            memo: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Returns the full descendant set of `seeds`, optionally including
    /// the seeds themselves.
    ///
    /// Empty seed sets expand to nothing; seed ids absent from the
    /// hierarchy contribute no children and are not an error.
    ///
    /// # Errors
    /// Propagates hierarchy store failures.
    pub fn descendants(
        &self,
        entity_type: &EntityType,
        seeds: &HashSet<EntityId>,
        include_seeds: bool,
    ) -> EngineResult<HashSet<EntityId>> {
        if seeds.is_empty() {
            return Ok(HashSet::new());
        }

        let key = {
            let mut sorted: Vec<EntityId> = seeds.iter().cloned().collect();
            sorted.sort();
            ExpandKey {
                entity_type: entity_type.clone(),
                seeds: sorted,
                include_seeds,
            }
        };

        if let Some(cached) = self.memo.write().get(&key) {
            trace!(entity_type = %entity_type, "hierarchy expansion memo hit");
            return Ok(cached.clone());
        }

        let adjacency = self.store.adjacency(entity_type)?;

        let mut discovered: HashSet<EntityId> = seeds.clone();
        let mut frontier: Vec<EntityId> = seeds.iter().cloned().collect();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for parent in frontier {
                if let Some(children) = adjacency.get(&parent) {
                    for child in children {
                        if discovered.insert(child.clone()) {
                            next.push(child.clone());
                        }
                    }
                }
            }
            frontier = next;
        }

        let result = if include_seeds {
            discovered
        } else {
            &discovered - seeds
        };

        debug!(
            entity_type = %entity_type,
            seeds = seeds.len(),
            expanded = result.len(),
            "hierarchy expansion"
        );
        self.memo.write().put(key, result.clone());
        Ok(result)
    }

    /// Drops every memoized expansion for one entity type.
    pub fn invalidate(&self, entity_type: &EntityType) {
        let mut memo = self.memo.write();
        let stale: Vec<ExpandKey> = memo
            .iter()
            .filter(|(key, _)| &key.entity_type == entity_type)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            memo.pop(&key);
        }
    }

    /// Drops every memoized expansion.
    pub fn clear(&self) {
        self.memo.write().clear();
    }
}
