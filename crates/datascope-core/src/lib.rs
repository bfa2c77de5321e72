//! # Datascope Core
//!
//! Core domain types for the datascope row-level scoping engine.
//!
//! This crate provides the foundational types used throughout the system:
//! - String-keyed name newtypes (principals, roles, groups, entity ids)
//! - Entity type descriptors and grant targets
//! - Grant records (`DataScope`) and their owners
//! - The resolved per-principal visibility summary (`ComputedScope`)
//! - Error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod grant;
pub mod name;
pub mod scope;

pub use entity::{EntityDescriptor, EntityType, Target};
pub use error::{CoreError, CoreResult};
pub use grant::{DataScope, GrantId, ScopeKind, ScopeOwner};
pub use name::{EntityId, GroupName, Membership, PrincipalName, RoleName};
pub use scope::{ComputedScope, ScopeClass};
