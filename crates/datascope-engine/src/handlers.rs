//! Shipped indirect-permission handlers.

use crate::{EngineResult, HierarchyExpander, IndirectPermission, Predicate};
use datascope_core::{ComputedScope, EntityType, PrincipalName};
use std::sync::Arc;

/// Container→member visibility derivation.
///
/// A FILTER grant on a container type (an instance group, a model group)
/// implies visibility of the rows placed in those containers, expanded
/// through the container hierarchy, so a grant on a parent group reaches
/// every descendant group's members. The implication is deliberately
/// one-way: visibility of a member never implies visibility of its
/// container.
pub struct ContainerMembershipHandler {
    container_type: EntityType,
    member_type: EntityType,
    member_attr: String,
    expose_descendant_containers: bool,
    expander: Arc<HierarchyExpander>,
}

impl ContainerMembershipHandler {
    /// Creates a derivation rule.
    ///
    /// `member_attr` names the attribute on member rows holding the owning
    /// container id.
    pub fn new(
        container_type: EntityType,
        member_type: EntityType,
        member_attr: impl Into<String>,
        expander: Arc<HierarchyExpander>,
    ) -> Self {
        Self {
            container_type,
            member_type,
            member_attr: member_attr.into(),
            expose_descendant_containers: false,
            expander,
        }
    }

    /// Also derive visibility of descendant container rows themselves from
    /// a grant on an ancestor.
    #[must_use]
    pub fn with_descendant_containers(mut self) -> Self {
        self.expose_descendant_containers = true;
        self
    }
}

impl IndirectPermission for ContainerMembershipHandler {
    fn derive(
        &self,
        scope: &ComputedScope,
        entity_type: &EntityType,
        _principal: &PrincipalName,
    ) -> EngineResult<Option<Predicate>> {
        let Some(seeds) = scope.targets_for(&self.container_type) else {
            return Ok(None);
        };

        if entity_type == &self.member_type {
            let containers = self.expander.descendants(&self.container_type, seeds, true)?;
            return Ok(Some(Predicate::AttrIn {
                attr: self.member_attr.clone(),
                values: containers,
            }));
        }

        if self.expose_descendant_containers && entity_type == &self.container_type {
            let descendants = self
                .expander
                .descendants(&self.container_type, seeds, false)?;
            if descendants.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Predicate::IdIn(descendants)));
        }

        Ok(None)
    }
}

/// OR-combines several derivation rules under one namespace.
///
/// The registry holds one handler per namespace; namespaces with multiple
/// container relations chain them here.
#[derive(Default)]
pub struct HandlerChain {
    rules: Vec<Arc<dyn IndirectPermission>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    #[must_use]
    pub fn with(mut self, rule: Arc<dyn IndirectPermission>) -> Self {
        self.rules.push(rule);
        self
    }
}

impl IndirectPermission for HandlerChain {
    fn derive(
        &self,
        scope: &ComputedScope,
        entity_type: &EntityType,
        principal: &PrincipalName,
    ) -> EngineResult<Option<Predicate>> {
        let mut branches = Vec::new();
        for rule in &self.rules {
            if let Some(predicate) = rule.derive(scope, entity_type, principal)? {
                branches.push(predicate);
            }
        }
        if branches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Predicate::any_of(branches)))
        }
    }
}
