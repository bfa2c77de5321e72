//! End-to-end scenarios over the full engine wiring.

use datascope_core::{
    ComputedScope, DataScope, EntityDescriptor, EntityType, PrincipalName, ScopeKind, ScopeOwner,
    Target,
};
use datascope_engine::{
    ContainerMembershipHandler, EngineConfig, Predicate, QueryScope, Row, ScopeEngine,
};
use datascope_store::{
    InMemoryDirectory, InMemoryGrantStore, InMemoryHierarchy, InMemoryScopeCache,
};
use std::sync::Arc;

struct World {
    directory: Arc<InMemoryDirectory>,
    grants: Arc<InMemoryGrantStore>,
    hierarchy: Arc<InMemoryHierarchy>,
    engine: ScopeEngine,
}

fn world() -> World {
    let directory = Arc::new(InMemoryDirectory::new());
    let grants = Arc::new(InMemoryGrantStore::new());
    let hierarchy = Arc::new(InMemoryHierarchy::new());
    let cache = Arc::new(InMemoryScopeCache::new());
    let engine = ScopeEngine::new(
        directory.clone(),
        grants.clone(),
        hierarchy.clone(),
        cache,
        EngineConfig::default(),
    );
    World {
        directory,
        grants,
        hierarchy,
        engine,
    }
}

fn asset_type() -> EntityType {
    EntityType::new("cmdb", "asset")
}

#[test]
fn alice_sees_targeted_and_created_assets_only() {
    let w = world();
    w.engine
        .register_entity(EntityDescriptor::new(asset_type()).with_creator_tracking());

    w.directory.assign_role("alice", "R1");
    w.grants
        .upsert(
            DataScope::new("g1", ScopeOwner::Role("R1".into()), ScopeKind::Filter)
                .with_target(Target::new(asset_type(), "A1")),
        )
        .unwrap();

    let query = w
        .engine
        .scope_query(&PrincipalName::from("alice"), &asset_type())
        .unwrap();

    let a1 = Row::new("A1").created_by("someone-else");
    let a2 = Row::new("A2").created_by("alice");
    let a3 = Row::new("A3").created_by("someone-else");

    assert!(query.permits(&a1)); // targeted
    assert!(query.permits(&a2)); // created by alice
    assert!(!query.permits(&a3)); // neither
}

#[test]
fn system_principal_allows_all_with_zero_grants() {
    let w = world();
    assert_eq!(
        w.engine.resolve_scope(&PrincipalName::system()).unwrap(),
        ComputedScope::all()
    );
    assert_eq!(
        w.engine
            .scope_query(&PrincipalName::system(), &asset_type())
            .unwrap(),
        QueryScope::AllowAll
    );
}

#[test]
fn group_all_grant_makes_member_unrestricted() {
    let w = world();
    w.directory.add_group_member("G1", "bob");
    w.grants
        .upsert(DataScope::new(
            "g1",
            ScopeOwner::Group("G1".into()),
            ScopeKind::All,
        ))
        .unwrap();

    assert_eq!(
        w.engine.resolve_scope(&PrincipalName::from("bob")).unwrap(),
        ComputedScope::all()
    );
}

#[test]
fn anonymous_principal_is_denied() {
    let w = world();
    assert_eq!(
        w.engine
            .scope_query(&PrincipalName::from(""), &asset_type())
            .unwrap(),
        QueryScope::DenyAll
    );
}

#[test]
fn no_access_and_no_restriction_are_distinct() {
    let w = world();
    w.directory.add_principal("nobody");

    let denied = w
        .engine
        .scope_query(&PrincipalName::from("nobody"), &asset_type())
        .unwrap();
    let open = w
        .engine
        .scope_query(&PrincipalName::system(), &asset_type())
        .unwrap();

    assert_eq!(denied, QueryScope::DenyAll);
    assert_eq!(open, QueryScope::AllowAll);
    assert_ne!(denied, open);
}

#[test]
fn grant_mutations_take_effect_after_published_events() {
    let w = world();
    let alice = PrincipalName::from("alice");
    w.directory.assign_role("alice", "R1");

    // First resolution caches "no grants".
    assert_eq!(
        w.engine.resolve_scope(&alice).unwrap(),
        ComputedScope::none()
    );

    // Grant lands on the role; publishing the store's events evicts every
    // holder, so the next read recomputes.
    let events = w
        .grants
        .upsert(DataScope::new(
            "g1",
            ScopeOwner::Role("R1".into()),
            ScopeKind::All,
        ))
        .unwrap();
    w.engine.publish_all(events).unwrap();

    assert_eq!(w.engine.resolve_scope(&alice).unwrap(), ComputedScope::all());

    // Deleting the grant and publishing flips it back.
    let event = w.grants.remove(&"g1".into()).unwrap();
    w.engine.publish(&event).unwrap();
    assert_eq!(
        w.engine.resolve_scope(&alice).unwrap(),
        ComputedScope::none()
    );
}

#[test]
fn membership_change_refreshes_cached_none() {
    let w = world();
    let dave = PrincipalName::from("dave");

    // Unknown principal resolves (and caches) no access.
    assert_eq!(w.engine.resolve_scope(&dave).unwrap(), ComputedScope::none());

    w.grants
        .upsert(DataScope::new(
            "g1",
            ScopeOwner::Group("G1".into()),
            ScopeKind::All,
        ))
        .unwrap();
    let event = w.directory.add_group_member("G1", "dave");
    w.engine.publish(&event).unwrap();

    assert_eq!(w.engine.resolve_scope(&dave).unwrap(), ComputedScope::all());
}

#[test]
fn container_grant_reaches_descendant_instances() {
    let w = world();
    let group_type = EntityType::new("cmdb", "instance_group");
    let instance_type = EntityType::new("cmdb", "instance");

    w.engine.register_entity(EntityDescriptor::new(instance_type.clone()));
    w.engine
        .register_indirect_handler(
            "cmdb",
            Arc::new(ContainerMembershipHandler::new(
                group_type.clone(),
                instance_type.clone(),
                "group_id",
                w.engine.expander().clone(),
            )),
        )
        .unwrap();

    w.hierarchy.add_child(group_type.clone(), "root", "child");
    w.hierarchy.add_child(group_type.clone(), "child", "leaf");

    w.directory.assign_role("erin", "R1");
    w.grants
        .upsert(
            DataScope::new("g1", ScopeOwner::Role("R1".into()), ScopeKind::Filter)
                .with_target(Target::new(group_type.clone(), "root")),
        )
        .unwrap();

    let query = w
        .engine
        .scope_query(&PrincipalName::from("erin"), &instance_type)
        .unwrap();

    assert!(query.permits(&Row::new("I1").with_attr("group_id", "leaf")));
    assert!(query.permits(&Row::new("I2").with_attr("group_id", "root")));
    assert!(!query.permits(&Row::new("I3").with_attr("group_id", "elsewhere")));
}

#[test]
fn hierarchy_mutation_refreshes_derived_visibility() {
    let w = world();
    let group_type = EntityType::new("cmdb", "instance_group");
    let instance_type = EntityType::new("cmdb", "instance");

    w.engine
        .register_indirect_handler(
            "cmdb",
            Arc::new(ContainerMembershipHandler::new(
                group_type.clone(),
                instance_type.clone(),
                "group_id",
                w.engine.expander().clone(),
            )),
        )
        .unwrap();

    w.directory.assign_role("erin", "R1");
    w.grants
        .upsert(
            DataScope::new("g1", ScopeOwner::Role("R1".into()), ScopeKind::Filter)
                .with_target(Target::new(group_type.clone(), "root")),
        )
        .unwrap();

    let row = Row::new("I1").with_attr("group_id", "late-child");
    let before = w
        .engine
        .scope_query(&PrincipalName::from("erin"), &instance_type)
        .unwrap();
    assert!(!before.permits(&row));

    // A new subgroup appears under the granted root; publishing the
    // hierarchy event evicts the expansion memo.
    let event = w.hierarchy.add_child(group_type, "root", "late-child");
    w.engine.publish(&event).unwrap();

    let after = w
        .engine
        .scope_query(&PrincipalName::from("erin"), &instance_type)
        .unwrap();
    assert!(after.permits(&row));
}

#[test]
fn filter_scope_with_no_branches_sees_zero_rows() {
    let w = world();
    let model_type = EntityType::new("cmdb", "model");

    // A FILTER grant targeting only assets gives no visibility into an
    // unrelated, creator-less entity type.
    w.directory.assign_role("alice", "R1");
    w.grants
        .upsert(
            DataScope::new("g1", ScopeOwner::Role("R1".into()), ScopeKind::Filter)
                .with_target(Target::new(asset_type(), "A1")),
        )
        .unwrap();

    let query = w
        .engine
        .scope_query(&PrincipalName::from("alice"), &model_type)
        .unwrap();
    assert_eq!(query, QueryScope::Filtered(Predicate::Nothing));
    assert!(!query.permits(&Row::new("M1")));
}
