//! Grant store boundary.

use crate::StoreResult;
use datascope_core::{DataScope, GroupName, PrincipalName, RoleName};
use std::collections::HashSet;

/// Query access to grant records.
pub trait GrantStore: Send + Sync {
    /// All grants whose owner is the principal itself, any of the given
    /// roles, or any of the given groups.
    ///
    /// This is one logical OR-query answered from a single consistent
    /// snapshot, not three reads merged by the caller.
    fn grants_for(
        &self,
        principal: &PrincipalName,
        roles: &HashSet<RoleName>,
        groups: &HashSet<GroupName>,
    ) -> StoreResult<Vec<DataScope>>;
}
