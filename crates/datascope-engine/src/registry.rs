//! Indirect-permission handler registry.

use crate::{EngineError, EngineResult, Predicate};
use datascope_core::{ComputedScope, EntityType, PrincipalName};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Per-namespace derivation of implied visibility.
///
/// Direct grants are issued on leaf containers; many entity types derive
/// visibility transitively from them (a grant on a model group implies
/// visibility of every model inside it). Implementations receive the
/// already-resolved scope and contribute an extra predicate branch, or
/// `None` when the scope implies nothing for the queried type.
pub trait IndirectPermission: Send + Sync {
    /// Derives an additional predicate for `entity_type` from the
    /// principal's computed scope.
    ///
    /// # Errors
    /// Returns an error only on store failure; "nothing derived" is
    /// `Ok(None)`.
    fn derive(
        &self,
        scope: &ComputedScope,
        entity_type: &EntityType,
        principal: &PrincipalName,
    ) -> EngineResult<Option<Predicate>>;
}

/// Append-only map from entity-type namespace to its handler.
///
/// Populated at process start and read-only thereafter; registering a
/// namespace twice is an error. Namespaces without a handler simply get
/// direct-grant-only resolution.
#[derive(Default)]
pub struct IndirectRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn IndirectPermission>>>,
}

impl IndirectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for a namespace.
    ///
    /// # Errors
    /// Fails if the namespace already has a handler.
    pub fn register(
        &self,
        namespace: impl Into<String>,
        handler: Arc<dyn IndirectPermission>,
    ) -> EngineResult<()> {
        let namespace = namespace.into();
        let mut handlers = self.handlers.write();
        if handlers.contains_key(&namespace) {
            return Err(EngineError::HandlerAlreadyRegistered(namespace));
        }
        debug!(namespace = %namespace, "indirect handler registered");
        handlers.insert(namespace, handler);
        Ok(())
    }

    /// Invokes the handler registered for the entity type's namespace.
    ///
    /// # Errors
    /// Propagates handler failures; a missing handler is `Ok(None)`.
    pub fn derive(
        &self,
        scope: &ComputedScope,
        entity_type: &EntityType,
        principal: &PrincipalName,
    ) -> EngineResult<Option<Predicate>> {
        let handler = self.handlers.read().get(entity_type.namespace()).cloned();
        match handler {
            Some(handler) => handler.derive(scope, entity_type, principal),
            None => Ok(None),
        }
    }
}
