//! Principal directory boundary.

use crate::StoreResult;
use datascope_core::{GroupName, Membership, PrincipalName, RoleName};

/// Lookup of principals and their role/group membership.
///
/// Implementations must answer [`membership`](DirectoryStore::membership)
/// from a single consistent snapshot; the engine relies on it being one
/// read rather than a per-role fan-out.
pub trait DirectoryStore: Send + Sync {
    /// Returns the principal's membership, or `None` if the principal is
    /// unknown. Unknown principals are not an error; resolution degrades
    /// to no access.
    fn membership(&self, principal: &PrincipalName) -> StoreResult<Option<Membership>>;

    /// Every principal currently holding the role, directly or through a
    /// group. Used for invalidation fan-out on role-level grant changes.
    fn principals_with_role(&self, role: &RoleName) -> StoreResult<Vec<PrincipalName>>;

    /// Every member of the group. Used for invalidation fan-out on
    /// group-level grant changes.
    fn group_members(&self, group: &GroupName) -> StoreResult<Vec<PrincipalName>>;
}
