//! Per-principal scope resolution.

use crate::EngineResult;
use datascope_core::{ComputedScope, PrincipalName};
use datascope_store::{DirectoryStore, GrantStore, ScopeCacheStore};
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves a principal to its [`ComputedScope`].
///
/// Resolution is cache-first with no TTL; entries live until the
/// invalidation service evicts them. The uncached path is two bulk reads:
/// one directory lookup for effective membership and one grant snapshot.
pub struct ScopeResolver {
    directory: Arc<dyn DirectoryStore>,
    grants: Arc<dyn GrantStore>,
    cache: Arc<dyn ScopeCacheStore>,
}

impl ScopeResolver {
    /// Creates a resolver over the given boundaries.
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        grants: Arc<dyn GrantStore>,
        cache: Arc<dyn ScopeCacheStore>,
    ) -> Self {
        Self {
            directory,
            grants,
            cache,
        }
    }

    /// Resolves the principal's scope.
    ///
    /// The system principal bypasses resolution and caching entirely. An
    /// unknown principal is not an error: it resolves to the no-access
    /// scope, which is cached like any other result and evicted when the
    /// principal's membership first changes.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn resolve(&self, principal: &PrincipalName) -> EngineResult<ComputedScope> {
        if principal.is_system() {
            trace!("system principal bypasses scoping");
            return Ok(ComputedScope::all());
        }

        if let Some(cached) = self.cache.get(principal) {
            trace!(principal = %principal, "scope cache hit");
            return Ok(cached);
        }

        let scope = match self.directory.membership(principal)? {
            None => {
                debug!(principal = %principal, "unknown principal, resolving to no access");
                ComputedScope::none()
            }
            Some(membership) => {
                let grants =
                    self.grants
                        .grants_for(principal, &membership.roles, &membership.groups)?;
                let scope = ComputedScope::from_grants(&grants);
                debug!(
                    principal = %principal,
                    class = ?scope.class,
                    grants = grants.len(),
                    "scope resolved"
                );
                scope
            }
        };

        self.cache.put(principal, scope.clone());
        Ok(scope)
    }
}
