//! Explicit cache invalidation.

use crate::{EngineResult, HierarchyExpander};
use datascope_core::ScopeOwner;
use datascope_store::{DirectoryStore, ScopeCacheStore, ScopeEvent};
use std::sync::Arc;
use tracing::debug;

/// Maps mutation events to cache evictions.
///
/// Membership edges evict exactly the affected principal; role- and
/// group-owned grant changes fan out to every reachable principal,
/// enumerated through the directory at invalidation time; hierarchy
/// changes evict the expansion memo. Writers racing an invalidation are
/// tolerated; the next read after the eviction recomputes.
pub struct Invalidator {
    directory: Arc<dyn DirectoryStore>,
    cache: Arc<dyn ScopeCacheStore>,
    expander: Arc<HierarchyExpander>,
}

impl Invalidator {
    /// Creates an invalidation service.
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        cache: Arc<dyn ScopeCacheStore>,
        expander: Arc<HierarchyExpander>,
    ) -> Self {
        Self {
            directory,
            cache,
            expander,
        }
    }

    /// Applies one mutation event.
    ///
    /// # Errors
    /// Propagates directory failures during fan-out enumeration.
    pub fn apply(&self, event: &ScopeEvent) -> EngineResult<()> {
        match event {
            ScopeEvent::MembershipChanged { principal }
            | ScopeEvent::PrincipalRemoved { principal } => {
                self.cache.remove(principal);
            }
            ScopeEvent::GroupRolesChanged { group } => {
                for member in self.directory.group_members(group)? {
                    self.cache.remove(&member);
                }
            }
            ScopeEvent::GrantChanged { owner } => match owner {
                ScopeOwner::User(principal) => self.cache.remove(principal),
                ScopeOwner::Role(role) => {
                    for principal in self.directory.principals_with_role(role)? {
                        self.cache.remove(&principal);
                    }
                }
                ScopeOwner::Group(group) => {
                    for member in self.directory.group_members(group)? {
                        self.cache.remove(&member);
                    }
                }
            },
            ScopeEvent::HierarchyChanged { entity_type } => {
                self.expander.invalidate(entity_type);
            }
        }
        debug!(?event, "invalidation applied");
        Ok(())
    }

    /// Applies a batch of events in order.
    ///
    /// # Errors
    /// Stops at the first failing event.
    pub fn apply_all(&self, events: impl IntoIterator<Item = ScopeEvent>) -> EngineResult<()> {
        for event in events {
            self.apply(&event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datascope_core::{ComputedScope, PrincipalName};
    use datascope_store::{InMemoryDirectory, InMemoryHierarchy, InMemoryScopeCache};

    fn service() -> (Arc<InMemoryDirectory>, Arc<InMemoryScopeCache>, Invalidator) {
        let directory = Arc::new(InMemoryDirectory::new());
        let cache = Arc::new(InMemoryScopeCache::new());
        let expander = Arc::new(HierarchyExpander::new(
            Arc::new(InMemoryHierarchy::new()),
            16,
        ));
        let invalidator = Invalidator::new(directory.clone(), cache.clone(), expander);
        (directory, cache, invalidator)
    }

    #[test]
    fn membership_change_evicts_one_principal() {
        let (_, cache, invalidator) = service();
        cache.put(&PrincipalName::from("alice"), ComputedScope::all());
        cache.put(&PrincipalName::from("bob"), ComputedScope::all());

        invalidator
            .apply(&ScopeEvent::MembershipChanged {
                principal: "alice".into(),
            })
            .unwrap();

        assert!(cache.get(&PrincipalName::from("alice")).is_none());
        assert!(cache.get(&PrincipalName::from("bob")).is_some());
    }

    #[test]
    fn group_grant_change_fans_out_to_members() {
        let (directory, cache, invalidator) = service();
        directory.add_group_member("G1", "alice");
        directory.add_group_member("G1", "bob");
        directory.add_principal("carol");

        for name in ["alice", "bob", "carol"] {
            cache.put(&PrincipalName::from(name), ComputedScope::all());
        }

        invalidator
            .apply(&ScopeEvent::GrantChanged {
                owner: ScopeOwner::Group("G1".into()),
            })
            .unwrap();

        assert!(cache.get(&PrincipalName::from("alice")).is_none());
        assert!(cache.get(&PrincipalName::from("bob")).is_none());
        assert!(cache.get(&PrincipalName::from("carol")).is_some());
    }

    #[test]
    fn role_grant_change_reaches_group_inherited_holders() {
        let (directory, cache, invalidator) = service();
        directory.assign_role("alice", "R1");
        directory.add_group_member("G1", "bob");
        directory.grant_role_to_group("G1", "R1");

        cache.put(&PrincipalName::from("alice"), ComputedScope::all());
        cache.put(&PrincipalName::from("bob"), ComputedScope::all());

        invalidator
            .apply(&ScopeEvent::GrantChanged {
                owner: ScopeOwner::Role("R1".into()),
            })
            .unwrap();

        assert!(cache.get(&PrincipalName::from("alice")).is_none());
        assert!(cache.get(&PrincipalName::from("bob")).is_none());
    }
}
