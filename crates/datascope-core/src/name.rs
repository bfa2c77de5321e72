//! String-keyed names using the newtype pattern.
//!
//! These types prevent accidental mixing of principal, role, group, and
//! entity identifiers at compile time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

macro_rules! define_name {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a name from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the name as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the name is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

pub(crate) use define_name;

define_name!(PrincipalName, "A principal (user) addressed by stable username.");
define_name!(RoleName, "A role identifier.");
define_name!(GroupName, "A group identifier.");
define_name!(EntityId, "An opaque entity identifier within one entity type.");

impl PrincipalName {
    /// The reserved identity that bypasses all scoping.
    pub const SYSTEM: &'static str = "system";

    /// Returns the system principal.
    #[must_use]
    pub fn system() -> Self {
        Self(Self::SYSTEM.to_string())
    }

    /// Returns true if this is the system principal.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.0 == Self::SYSTEM
    }

    /// Returns true if this is the anonymous sentinel (empty name).
    ///
    /// Anonymous principals never get scope resolution; callers treat them
    /// as denied.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

/// A principal's directory membership: the roles and groups reachable from
/// one user record.
///
/// `roles` is the *effective* role set (directly assigned roles unioned
/// with every role inherited through group membership), so resolution stays
/// a single directory read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Effective roles (direct and group-inherited).
    pub roles: HashSet<RoleName>,
    /// Groups the principal belongs to.
    pub groups: HashSet<GroupName>,
}

impl Membership {
    /// Creates an empty membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<RoleName>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Adds a group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<GroupName>) -> Self {
        self.groups.insert(group.into());
        self
    }
}
