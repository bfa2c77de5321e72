//! Storage boundaries for the datascope engine.
//!
//! This crate defines the external-collaborator traits the engine reads
//! through (principal directory, grant store, hierarchy store, and scope
//! cache) plus in-memory reference implementations suitable for tests and
//! single-process deployments.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod directory;
pub mod error;
pub mod event;
pub mod grants;
pub mod hierarchy;
pub mod memory;

pub use cache::{CacheStats, InMemoryScopeCache, ScopeCacheStore};
pub use directory::DirectoryStore;
pub use error::{StoreError, StoreResult};
pub use event::ScopeEvent;
pub use grants::GrantStore;
pub use hierarchy::HierarchyStore;
pub use memory::{InMemoryDirectory, InMemoryGrantStore, InMemoryHierarchy};
