//! Storage-level visibility predicates.
//!
//! A [`QueryScope`] is what query layers consume: either no filtering at
//! all, a categorical deny, or a [`Predicate`] to translate into their own
//! query language. `AllowAll` and `DenyAll` are distinct variants on
//! purpose — an empty predicate means "match everything" in most query
//! languages, the opposite of "no access", so callers must be able to tell
//! them apart.

use datascope_core::{EntityId, PrincipalName};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The visibility filter for one (principal, entity type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryScope {
    /// No restriction: the consumer applies no filter.
    AllowAll,
    /// No access: the consumer must return zero rows.
    DenyAll,
    /// Restricted: rows matching the predicate are visible.
    Filtered(Predicate),
}

impl QueryScope {
    /// Returns true if no filtering applies.
    #[must_use]
    pub fn is_allow_all(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// Returns true if all rows are denied.
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        matches!(self, Self::DenyAll)
    }

    /// Evaluates the scope against one row's facts.
    #[must_use]
    pub fn permits(&self, row: &Row) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DenyAll => false,
            Self::Filtered(predicate) => predicate.matches(row),
        }
    }
}

/// A disjunctive visibility predicate over row attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Matches no rows. A FILTER scope with no contributing branches
    /// resolves to this — intentionally restrictive.
    Nothing,
    /// The row id is in the set.
    IdIn(HashSet<EntityId>),
    /// The row's created-by attribute equals the principal.
    CreatedBy(PrincipalName),
    /// A named row attribute is in the set.
    AttrIn {
        /// Attribute name on the target entity type.
        attr: String,
        /// Accepted values.
        values: HashSet<EntityId>,
    },
    /// Any branch matches (OR).
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// OR-combines branches, dropping empty ones and flattening trivial
    /// cases: zero live branches collapse to [`Predicate::Nothing`], a
    /// single branch stands alone.
    #[must_use]
    pub fn any_of(branches: Vec<Predicate>) -> Self {
        let mut live: Vec<Predicate> = branches
            .into_iter()
            .filter(|branch| !branch.is_nothing())
            .collect();
        match live.len() {
            0 => Self::Nothing,
            1 => live.remove(0),
            _ => Self::AnyOf(live),
        }
    }

    /// OR-combines two predicates.
    #[must_use]
    pub fn or(self, other: Predicate) -> Self {
        Self::any_of(vec![self, other])
    }

    /// Returns true if the predicate can match no row.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        match self {
            Self::Nothing => true,
            Self::IdIn(ids) => ids.is_empty(),
            Self::AttrIn { values, .. } => values.is_empty(),
            Self::AnyOf(branches) => branches.iter().all(Self::is_nothing),
            Self::CreatedBy(_) => false,
        }
    }

    /// Evaluates the predicate against one row's facts.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Nothing => false,
            Self::IdIn(ids) => ids.contains(&row.id),
            Self::CreatedBy(principal) => row.created_by.as_ref() == Some(principal),
            Self::AttrIn { attr, values } => row
                .attrs
                .get(attr)
                .is_some_and(|value| values.contains(value)),
            Self::AnyOf(branches) => branches.iter().any(|branch| branch.matches(row)),
        }
    }
}

/// The facts about one row a predicate can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Row id.
    pub id: EntityId,
    /// Creator, if the entity type tracks one.
    pub created_by: Option<PrincipalName>,
    /// Named reference attributes (e.g. the owning container id).
    pub attrs: HashMap<String, EntityId>,
}

impl Row {
    /// Creates a row with no creator and no attributes.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            created_by: None,
            attrs: HashMap::new(),
        }
    }

    /// Sets the creator.
    #[must_use]
    pub fn created_by(mut self, principal: impl Into<PrincipalName>) -> Self {
        self.created_by = Some(principal.into());
        self
    }

    /// Adds a reference attribute.
    #[must_use]
    pub fn with_attr(mut self, attr: impl Into<String>, value: impl Into<EntityId>) -> Self {
        self.attrs.insert(attr.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> HashSet<EntityId> {
        values.iter().map(|v| EntityId::from(*v)).collect()
    }

    #[test]
    fn allow_all_and_deny_all_are_never_equal() {
        assert_ne!(QueryScope::AllowAll, QueryScope::DenyAll);
        // An empty-filter scope is also not the same value as AllowAll.
        assert_ne!(
            QueryScope::Filtered(Predicate::Nothing),
            QueryScope::AllowAll
        );
    }

    #[test]
    fn deny_all_permits_no_row() {
        let row = Row::new("A1");
        assert!(QueryScope::AllowAll.permits(&row));
        assert!(!QueryScope::DenyAll.permits(&row));
        assert!(!QueryScope::Filtered(Predicate::Nothing).permits(&row));
    }

    #[test]
    fn id_in_matches_only_listed_ids() {
        let predicate = Predicate::IdIn(ids(&["A1", "A2"]));
        assert!(predicate.matches(&Row::new("A1")));
        assert!(!predicate.matches(&Row::new("A3")));
    }

    #[test]
    fn created_by_matches_creator() {
        let predicate = Predicate::CreatedBy(PrincipalName::from("alice"));
        assert!(predicate.matches(&Row::new("A1").created_by("alice")));
        assert!(!predicate.matches(&Row::new("A1").created_by("bob")));
        assert!(!predicate.matches(&Row::new("A1")));
    }

    #[test]
    fn attr_in_requires_the_attribute() {
        let predicate = Predicate::AttrIn {
            attr: "group_id".to_string(),
            values: ids(&["G1"]),
        };
        assert!(predicate.matches(&Row::new("I1").with_attr("group_id", "G1")));
        assert!(!predicate.matches(&Row::new("I2").with_attr("group_id", "G2")));
        assert!(!predicate.matches(&Row::new("I3")));
    }

    #[test]
    fn any_of_collapses_trivial_cases() {
        assert_eq!(Predicate::any_of(vec![]), Predicate::Nothing);
        assert_eq!(
            Predicate::any_of(vec![Predicate::Nothing, Predicate::IdIn(ids(&["A1"]))]),
            Predicate::IdIn(ids(&["A1"]))
        );
        assert_eq!(
            Predicate::any_of(vec![Predicate::IdIn(HashSet::new())]),
            Predicate::Nothing
        );
    }

    #[test]
    fn query_scope_round_trips_through_json() {
        let scope = QueryScope::Filtered(
            Predicate::IdIn(ids(&["A1"])).or(Predicate::CreatedBy(PrincipalName::from("alice"))),
        );
        let json = serde_json::to_string(&scope).unwrap();
        let back: QueryScope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scope);
    }

    #[test]
    fn any_of_is_a_disjunction() {
        let predicate = Predicate::IdIn(ids(&["A1"]))
            .or(Predicate::CreatedBy(PrincipalName::from("alice")));
        assert!(predicate.matches(&Row::new("A1")));
        assert!(predicate.matches(&Row::new("A9").created_by("alice")));
        assert!(!predicate.matches(&Row::new("A9").created_by("bob")));
    }
}
