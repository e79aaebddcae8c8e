//! Authenticated request context.

use crate::{OrgId, Role, UserId};

/// The authenticated caller: tenant id, user id, and role.
///
/// Passed explicitly into every tenant-scoped operation; never inferred
/// from ambient state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub org_id: OrgId,
    pub user_id: UserId,
    pub role: Role,
}

impl AuthContext {
    pub fn new(org_id: OrgId, user_id: UserId, role: Role) -> Self {
        Self {
            org_id,
            user_id,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
