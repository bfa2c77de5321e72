//! In-memory reference stores.
//!
//! These back tests and single-process deployments. Every mutator returns
//! the [`ScopeEvent`]s the caller must publish to the invalidation service,
//! so no write path can silently skip cache eviction.

use crate::{DirectoryStore, GrantStore, HierarchyStore, ScopeEvent, StoreResult};
use datascope_core::{
    DataScope, EntityId, EntityType, GrantId, GroupName, Membership, PrincipalName, RoleName,
    ScopeOwner,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct UserRecord {
    roles: HashSet<RoleName>,
    groups: HashSet<GroupName>,
}

/// In-memory principal directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<PrincipalName, UserRecord>>,
    group_roles: RwLock<HashMap<GroupName, HashSet<RoleName>>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a principal with no memberships.
    pub fn add_principal(&self, principal: impl Into<PrincipalName>) -> ScopeEvent {
        let principal = principal.into();
        self.users.write().entry(principal.clone()).or_default();
        ScopeEvent::MembershipChanged { principal }
    }

    /// Removes a principal.
    pub fn remove_principal(&self, principal: &PrincipalName) -> ScopeEvent {
        self.users.write().remove(principal);
        ScopeEvent::PrincipalRemoved {
            principal: principal.clone(),
        }
    }

    /// Assigns a role directly to a principal, creating the principal
    /// record if absent.
    pub fn assign_role(
        &self,
        principal: impl Into<PrincipalName>,
        role: impl Into<RoleName>,
    ) -> ScopeEvent {
        let principal = principal.into();
        self.users
            .write()
            .entry(principal.clone())
            .or_default()
            .roles
            .insert(role.into());
        ScopeEvent::MembershipChanged { principal }
    }

    /// Removes a direct role assignment.
    pub fn revoke_role(&self, principal: &PrincipalName, role: &RoleName) -> ScopeEvent {
        if let Some(record) = self.users.write().get_mut(principal) {
            record.roles.remove(role);
        }
        ScopeEvent::MembershipChanged {
            principal: principal.clone(),
        }
    }

    /// Adds a principal to a group, creating the principal record if
    /// absent.
    pub fn add_group_member(
        &self,
        group: impl Into<GroupName>,
        principal: impl Into<PrincipalName>,
    ) -> ScopeEvent {
        let principal = principal.into();
        self.users
            .write()
            .entry(principal.clone())
            .or_default()
            .groups
            .insert(group.into());
        ScopeEvent::MembershipChanged { principal }
    }

    /// Removes a principal from a group.
    pub fn remove_group_member(&self, group: &GroupName, principal: &PrincipalName) -> ScopeEvent {
        if let Some(record) = self.users.write().get_mut(principal) {
            record.groups.remove(group);
        }
        ScopeEvent::MembershipChanged {
            principal: principal.clone(),
        }
    }

    /// Attaches a role to a group. Affects every member, hence the
    /// group-level event.
    pub fn grant_role_to_group(
        &self,
        group: impl Into<GroupName>,
        role: impl Into<RoleName>,
    ) -> ScopeEvent {
        let group = group.into();
        self.group_roles
            .write()
            .entry(group.clone())
            .or_default()
            .insert(role.into());
        ScopeEvent::GroupRolesChanged { group }
    }

    /// Detaches a role from a group.
    pub fn revoke_role_from_group(&self, group: &GroupName, role: &RoleName) -> ScopeEvent {
        if let Some(roles) = self.group_roles.write().get_mut(group) {
            roles.remove(role);
        }
        ScopeEvent::GroupRolesChanged {
            group: group.clone(),
        }
    }
}

impl DirectoryStore for InMemoryDirectory {
    fn membership(&self, principal: &PrincipalName) -> StoreResult<Option<Membership>> {
        let users = self.users.read();
        let Some(record) = users.get(principal) else {
            return Ok(None);
        };

        let group_roles = self.group_roles.read();
        let mut roles = record.roles.clone();
        for group in &record.groups {
            if let Some(inherited) = group_roles.get(group) {
                roles.extend(inherited.iter().cloned());
            }
        }

        Ok(Some(Membership {
            roles,
            groups: record.groups.clone(),
        }))
    }

    fn principals_with_role(&self, role: &RoleName) -> StoreResult<Vec<PrincipalName>> {
        // Lock order matches membership(): users before group_roles.
        let users = self.users.read();
        let group_roles = self.group_roles.read();
        let carrying_groups: HashSet<&GroupName> = group_roles
            .iter()
            .filter(|(_, roles)| roles.contains(role))
            .map(|(group, _)| group)
            .collect();

        Ok(users
            .iter()
            .filter(|(_, record)| {
                record.roles.contains(role)
                    || record.groups.iter().any(|g| carrying_groups.contains(g))
            })
            .map(|(principal, _)| principal.clone())
            .collect())
    }

    fn group_members(&self, group: &GroupName) -> StoreResult<Vec<PrincipalName>> {
        Ok(self
            .users
            .read()
            .iter()
            .filter(|(_, record)| record.groups.contains(group))
            .map(|(principal, _)| principal.clone())
            .collect())
    }
}

/// In-memory grant store.
#[derive(Debug, Default)]
pub struct InMemoryGrantStore {
    grants: RwLock<HashMap<GrantId, DataScope>>,
}

impl InMemoryGrantStore {
    /// Creates an empty grant store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a grant.
    ///
    /// Returns one event per affected owner: two when an update moved the
    /// grant between owners, since both sides' principals go stale.
    ///
    /// # Errors
    /// Rejects grants that fail [`DataScope::validate`].
    pub fn upsert(&self, grant: DataScope) -> StoreResult<Vec<ScopeEvent>> {
        grant.validate()?;

        let mut events = vec![ScopeEvent::GrantChanged {
            owner: grant.owner.clone(),
        }];

        let previous = self.grants.write().insert(grant.id.clone(), grant);
        if let Some(previous) = previous {
            if !events
                .iter()
                .any(|e| matches!(e, ScopeEvent::GrantChanged { owner } if *owner == previous.owner))
            {
                events.push(ScopeEvent::GrantChanged {
                    owner: previous.owner,
                });
            }
        }

        Ok(events)
    }

    /// Deletes a grant. Returns the invalidation event if it existed.
    pub fn remove(&self, id: &GrantId) -> Option<ScopeEvent> {
        self.grants
            .write()
            .remove(id)
            .map(|grant| ScopeEvent::GrantChanged { owner: grant.owner })
    }
}

impl GrantStore for InMemoryGrantStore {
    fn grants_for(
        &self,
        principal: &PrincipalName,
        roles: &HashSet<RoleName>,
        groups: &HashSet<GroupName>,
    ) -> StoreResult<Vec<DataScope>> {
        let grants = self.grants.read();
        let matched: Vec<DataScope> = grants
            .values()
            .filter(|grant| match &grant.owner {
                ScopeOwner::User(name) => name == principal,
                ScopeOwner::Role(name) => roles.contains(name),
                ScopeOwner::Group(name) => groups.contains(name),
            })
            .cloned()
            .collect();

        debug!(
            principal = %principal,
            matched = matched.len(),
            "grant snapshot read"
        );
        Ok(matched)
    }
}

/// In-memory container hierarchy.
#[derive(Debug, Default)]
pub struct InMemoryHierarchy {
    children: RwLock<HashMap<EntityType, HashMap<EntityId, Vec<EntityId>>>>,
}

impl InMemoryHierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a parent→child edge.
    pub fn add_child(
        &self,
        entity_type: EntityType,
        parent: impl Into<EntityId>,
        child: impl Into<EntityId>,
    ) -> ScopeEvent {
        let child = child.into();
        let mut map = self.children.write();
        let siblings = map
            .entry(entity_type.clone())
            .or_default()
            .entry(parent.into())
            .or_default();
        if !siblings.contains(&child) {
            siblings.push(child);
        }
        ScopeEvent::HierarchyChanged { entity_type }
    }

    /// Removes a parent→child edge.
    pub fn remove_child(
        &self,
        entity_type: &EntityType,
        parent: &EntityId,
        child: &EntityId,
    ) -> ScopeEvent {
        if let Some(adjacency) = self.children.write().get_mut(entity_type) {
            if let Some(siblings) = adjacency.get_mut(parent) {
                siblings.retain(|id| id != child);
            }
        }
        ScopeEvent::HierarchyChanged {
            entity_type: entity_type.clone(),
        }
    }
}

impl HierarchyStore for InMemoryHierarchy {
    fn adjacency(
        &self,
        entity_type: &EntityType,
    ) -> StoreResult<HashMap<EntityId, Vec<EntityId>>> {
        Ok(self
            .children
            .read()
            .get(entity_type)
            .cloned()
            .unwrap_or_default())
    }
}
