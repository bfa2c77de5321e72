//! Mutation events published by stores.
//!
//! Every write that can change what a principal is allowed to see produces
//! one of these events. The engine's invalidation service consumes them and
//! evicts exactly the affected cache entries; stores never touch caches
//! directly.

use datascope_core::{EntityType, GroupName, PrincipalName, ScopeOwner};
use serde::{Deserialize, Serialize};

/// A scoping-relevant mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScopeEvent {
    /// A role or group edge on one principal changed (including principal
    /// creation). Affects exactly that principal.
    MembershipChanged {
        /// The affected principal.
        principal: PrincipalName,
    },

    /// A principal was removed from the directory.
    PrincipalRemoved {
        /// The removed principal.
        principal: PrincipalName,
    },

    /// The role set of a group changed. Affects every member of the group.
    GroupRolesChanged {
        /// The affected group.
        group: GroupName,
    },

    /// A grant record was created, updated, or deleted. Affects the owner
    /// directly, or every principal reachable through the owning role or
    /// group.
    GrantChanged {
        /// The grant's owner.
        owner: ScopeOwner,
    },

    /// The container hierarchy for one entity type changed. Affects the
    /// hierarchy-expansion memo, not per-principal scopes.
    HierarchyChanged {
        /// The entity type whose adjacency changed.
        entity_type: EntityType,
    },
}
