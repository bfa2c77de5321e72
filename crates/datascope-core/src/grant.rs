//! Grant records (`DataScope`) and their owners.

use crate::{CoreError, CoreResult, GroupName, PrincipalName, RoleName, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::name::define_name!(GrantId, "Unique identifier for a grant record.");

/// The holder of a grant: exactly one of a user, a role, or a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ScopeOwner {
    /// Grant issued directly to a user.
    User(PrincipalName),
    /// Grant issued to a role; reaches every principal holding it.
    Role(RoleName),
    /// Grant issued to a group; reaches every member.
    Group(GroupName),
}

impl fmt::Display for ScopeOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(name) => write!(f, "user:{name}"),
            Self::Role(name) => write!(f, "role:{name}"),
            Self::Group(name) => write!(f, "group:{name}"),
        }
    }
}

/// Visibility rule carried by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Unrestricted visibility; targets are ignored.
    All,
    /// Rows whose created-by attribute equals the principal; targets are
    /// ignored.
    #[serde(rename = "self")]
    SelfOnly,
    /// Visibility limited to the named targets.
    Filter,
}

/// A grant record associating an owner with a visibility rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataScope {
    /// Grant id.
    pub id: GrantId,
    /// Who holds the grant.
    pub owner: ScopeOwner,
    /// Visibility rule.
    pub kind: ScopeKind,
    /// Targets; meaningful only for [`ScopeKind::Filter`].
    pub targets: Vec<Target>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DataScope {
    /// Creates a grant with no targets.
    pub fn new(id: impl Into<GrantId>, owner: ScopeOwner, kind: ScopeKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            owner,
            kind,
            targets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a target.
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Adds multiple targets.
    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Checks structural invariants.
    ///
    /// # Errors
    /// Returns an error if a non-FILTER grant names targets, since those
    /// targets would be silently ignored at resolution time.
    pub fn validate(&self) -> CoreResult<()> {
        if self.kind != ScopeKind::Filter && !self.targets.is_empty() {
            return Err(CoreError::InvalidGrant {
                id: self.id.to_string(),
                reason: format!("{:?} grants must not name targets", self.kind),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityType;

    fn asset(id: &str) -> Target {
        Target::new(EntityType::new("cmdb", "asset"), id)
    }

    #[test]
    fn filter_grant_accepts_targets() {
        let grant = DataScope::new(
            "g1",
            ScopeOwner::Role(RoleName::from("ops")),
            ScopeKind::Filter,
        )
        .with_target(asset("A1"));
        assert!(grant.validate().is_ok());
    }

    #[test]
    fn all_grant_rejects_targets() {
        let grant = DataScope::new("g2", ScopeOwner::User(PrincipalName::from("alice")), ScopeKind::All)
            .with_target(asset("A1"));
        assert!(grant.validate().is_err());
    }

    #[test]
    fn owner_display_is_prefixed() {
        assert_eq!(
            ScopeOwner::Group(GroupName::from("G1")).to_string(),
            "group:G1"
        );
    }

    #[test]
    fn kind_serializes_with_self_rename() {
        assert_eq!(
            serde_json::to_string(&ScopeKind::SelfOnly).unwrap(),
            "\"self\""
        );
        assert_eq!(serde_json::to_string(&ScopeKind::All).unwrap(), "\"all\"");
    }
}
