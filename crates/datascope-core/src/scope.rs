//! The resolved per-principal visibility summary.

use crate::{DataScope, EntityId, EntityType, ScopeKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Classification of a resolved scope.
///
/// Precedence when multiple grants reach one principal:
/// ALL > FILTER > SELF; a principal with no reachable grants is NONE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeClass {
    /// Unrestricted visibility.
    All,
    /// Visibility limited to the collected targets (plus creator rows and
    /// indirect derivations).
    Filter,
    /// Only rows the principal created.
    #[serde(rename = "self")]
    SelfOnly,
    /// No reachable grants; no visibility.
    None,
}

/// The materialized result of resolving all grants reachable by one
/// principal.
///
/// Computed on first access, cached keyed by principal name, and
/// invalidated explicitly on membership or grant mutation, never by TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedScope {
    /// The scope classification.
    pub class: ScopeClass,
    /// Per-entity-type target id sets; empty unless `class` is `Filter`.
    pub targets: HashMap<EntityType, HashSet<EntityId>>,
}

impl ComputedScope {
    /// Unrestricted scope.
    #[must_use]
    pub fn all() -> Self {
        Self {
            class: ScopeClass::All,
            targets: HashMap::new(),
        }
    }

    /// No-visibility scope.
    #[must_use]
    pub fn none() -> Self {
        Self {
            class: ScopeClass::None,
            targets: HashMap::new(),
        }
    }

    /// Creator-only scope.
    #[must_use]
    pub fn self_only() -> Self {
        Self {
            class: ScopeClass::SelfOnly,
            targets: HashMap::new(),
        }
    }

    /// Filtered scope over the given target sets.
    #[must_use]
    pub fn filtered(targets: HashMap<EntityType, HashSet<EntityId>>) -> Self {
        Self {
            class: ScopeClass::Filter,
            targets,
        }
    }

    /// Returns the target id set collected for one entity type, if any.
    #[must_use]
    pub fn targets_for(&self, entity_type: &EntityType) -> Option<&HashSet<EntityId>> {
        self.targets.get(entity_type)
    }

    /// Folds a set of reachable grants into a computed scope.
    ///
    /// An ALL grant short-circuits; FILTER targets are unioned per entity
    /// type; SELF grants (and FILTER grants with no targets) leave the
    /// default creator-only classification. Zero grants yields NONE.
    pub fn from_grants<'a>(grants: impl IntoIterator<Item = &'a DataScope>) -> Self {
        let mut targets: HashMap<EntityType, HashSet<EntityId>> = HashMap::new();
        let mut reachable = false;

        for grant in grants {
            reachable = true;
            match grant.kind {
                ScopeKind::All => return Self::all(),
                ScopeKind::SelfOnly => {}
                ScopeKind::Filter => {
                    for target in &grant.targets {
                        targets
                            .entry(target.entity_type.clone())
                            .or_default()
                            .insert(target.id.clone());
                    }
                }
            }
        }

        if !reachable {
            Self::none()
        } else if targets.is_empty() {
            Self::self_only()
        } else {
            Self::filtered(targets)
        }
    }
}
