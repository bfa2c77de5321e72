//! # Datascope Engine
//!
//! Per-principal row-level visibility: scope resolution with explicit cache
//! invalidation, storage-level query predicates, pluggable
//! indirect-permission derivation, and container hierarchy expansion.
//!
//! The engine reads through the boundaries defined in `datascope-store` and
//! never mutates them; writers publish [`ScopeEvent`]s
//! (`datascope_store::ScopeEvent`) through [`ScopeEngine::publish`] to keep
//! caches coherent.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod invalidate;
pub mod predicate;
pub mod registry;
pub mod resolver;

pub use catalog::EntityCatalog;
pub use engine::{EngineConfig, ScopeEngine};
pub use error::{EngineError, EngineResult};
pub use handlers::{ContainerMembershipHandler, HandlerChain};
pub use hierarchy::HierarchyExpander;
pub use invalidate::Invalidator;
pub use predicate::{Predicate, QueryScope, Row};
pub use registry::{IndirectPermission, IndirectRegistry};
pub use resolver::ScopeResolver;

// Re-exported so consumers can publish mutation events without depending on
// the store crate directly.
pub use datascope_store::ScopeEvent;
