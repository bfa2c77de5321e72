//! Scope cache boundary and in-memory implementation.

use datascope_core::{ComputedScope, PrincipalName};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key-value cache of computed scopes, keyed by principal.
///
/// No TTL semantics: explicit invalidation is authoritative. A clustered
/// deployment would back this with a shared store; the engine only needs
/// get/put/remove/clear.
pub trait ScopeCacheStore: Send + Sync {
    /// Returns the cached scope for a principal, if present.
    fn get(&self, principal: &PrincipalName) -> Option<ComputedScope>;

    /// Stores the scope for a principal, replacing any previous entry.
    fn put(&self, principal: &PrincipalName, scope: ComputedScope);

    /// Evicts one principal's entry.
    fn remove(&self, principal: &PrincipalName);

    /// Evicts everything.
    fn clear(&self);
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Cache hits.
    pub hits: u64,
    /// Cache misses.
    pub misses: u64,
    /// Explicit evictions.
    pub evictions: u64,
    /// Current number of cached scopes.
    pub entries: usize,
}

impl CacheStats {
    /// Returns the hit rate.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-local scope cache.
#[derive(Debug, Default)]
pub struct InMemoryScopeCache {
    entries: RwLock<HashMap<PrincipalName, ComputedScope>>,
    stats: RwLock<CacheStats>,
}

impl InMemoryScopeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.read().clone();
        stats.entries = self.entries.read().len();
        stats
    }
}

impl ScopeCacheStore for InMemoryScopeCache {
    fn get(&self, principal: &PrincipalName) -> Option<ComputedScope> {
        let found = self.entries.read().get(principal).cloned();
        let mut stats = self.stats.write();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    fn put(&self, principal: &PrincipalName, scope: ComputedScope) {
        self.entries.write().insert(principal.clone(), scope);
    }

    fn remove(&self, principal: &PrincipalName) {
        if self.entries.write().remove(principal).is_some() {
            self.stats.write().evictions += 1;
        }
    }

    fn clear(&self) {
        let mut entries = self.entries.write();
        self.stats.write().evictions += entries.len() as u64;
        entries.clear();
    }
}
