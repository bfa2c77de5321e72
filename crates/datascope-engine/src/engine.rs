//! The scoping engine facade.

use crate::{
    EngineResult, EntityCatalog, HierarchyExpander, IndirectPermission, IndirectRegistry,
    Invalidator, Predicate, QueryScope, ScopeResolver,
};
use datascope_core::{ComputedScope, EntityDescriptor, EntityType, PrincipalName, ScopeClass};
use datascope_store::{DirectoryStore, GrantStore, HierarchyStore, ScopeCacheStore, ScopeEvent};
use std::sync::Arc;
use tracing::debug;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Capacity of the hierarchy-expansion memo.
    pub hierarchy_memo_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hierarchy_memo_entries: 1024,
        }
    }
}

/// Wires resolution, query building, indirect derivation, and invalidation
/// over a set of store boundaries.
pub struct ScopeEngine {
    resolver: ScopeResolver,
    catalog: EntityCatalog,
    registry: IndirectRegistry,
    expander: Arc<HierarchyExpander>,
    invalidator: Invalidator,
}

impl ScopeEngine {
    /// Creates an engine over the given stores.
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        grants: Arc<dyn GrantStore>,
        hierarchy: Arc<dyn HierarchyStore>,
        cache: Arc<dyn ScopeCacheStore>,
        config: EngineConfig,
    ) -> Self {
        let expander = Arc::new(HierarchyExpander::new(
            hierarchy,
            config.hierarchy_memo_entries,
        ));
        Self {
            resolver: ScopeResolver::new(directory.clone(), grants, cache.clone()),
            catalog: EntityCatalog::new(),
            registry: IndirectRegistry::new(),
            invalidator: Invalidator::new(directory, cache, expander.clone()),
            expander,
        }
    }

    /// Resolves a principal's computed scope (see [`ScopeResolver`]).
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn resolve_scope(&self, principal: &PrincipalName) -> EngineResult<ComputedScope> {
        self.resolver.resolve(principal)
    }

    /// Builds the visibility filter for one (principal, entity type) pair.
    ///
    /// Anonymous principals are denied outright; resolution is
    /// unavailable for them. A scope classified `all` maps to
    /// [`QueryScope::AllowAll`], `none` to [`QueryScope::DenyAll`];
    /// `filter` and `self` scopes build a disjunction of direct targets,
    /// creator match, and indirect derivation. A disjunction with no
    /// contributing branch filters down to zero visible rows.
    ///
    /// # Errors
    /// Propagates store and handler failures.
    pub fn scope_query(
        &self,
        principal: &PrincipalName,
        entity_type: &EntityType,
    ) -> EngineResult<QueryScope> {
        if principal.is_anonymous() {
            debug!("anonymous principal, denying");
            return Ok(QueryScope::DenyAll);
        }

        let scope = self.resolver.resolve(principal)?;
        match scope.class {
            ScopeClass::All => Ok(QueryScope::AllowAll),
            ScopeClass::None => Ok(QueryScope::DenyAll),
            ScopeClass::Filter | ScopeClass::SelfOnly => {
                let mut branches = Vec::new();

                if let Some(ids) = scope.targets_for(entity_type) {
                    branches.push(Predicate::IdIn(ids.clone()));
                }
                if self.catalog.tracks_creator(entity_type) {
                    branches.push(Predicate::CreatedBy(principal.clone()));
                }
                if let Some(derived) = self.registry.derive(&scope, entity_type, principal)? {
                    branches.push(derived);
                }

                Ok(QueryScope::Filtered(Predicate::any_of(branches)))
            }
        }
    }

    /// Registers an entity-type descriptor.
    pub fn register_entity(&self, descriptor: EntityDescriptor) {
        self.catalog.register(descriptor);
    }

    /// Registers the indirect handler for a namespace. Startup-time only.
    ///
    /// # Errors
    /// Fails if the namespace already has a handler.
    pub fn register_indirect_handler(
        &self,
        namespace: impl Into<String>,
        handler: Arc<dyn IndirectPermission>,
    ) -> EngineResult<()> {
        self.registry.register(namespace, handler)
    }

    /// Applies one mutation event to the caches.
    ///
    /// # Errors
    /// Propagates directory failures during fan-out.
    pub fn publish(&self, event: &ScopeEvent) -> EngineResult<()> {
        self.invalidator.apply(event)
    }

    /// Applies a batch of mutation events in order.
    ///
    /// # Errors
    /// Stops at the first failing event.
    pub fn publish_all(&self, events: impl IntoIterator<Item = ScopeEvent>) -> EngineResult<()> {
        self.invalidator.apply_all(events)
    }

    /// The hierarchy expander, for handler construction.
    #[must_use]
    pub fn expander(&self) -> &Arc<HierarchyExpander> {
        &self.expander
    }

    /// The entity catalog.
    #[must_use]
    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }
}
