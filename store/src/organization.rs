//! Organization (tenant) storage trait.

use crate::StoreError;
use verity_types::{OrgId, Organization, User};

/// Trait for storing organizations.
pub trait OrganizationStore {
    /// Create an organization together with its first (admin) user in
    /// one write. Fails `Duplicate` if the user's email is already
    /// registered, in which case neither row is written.
    fn create_organization_with_admin(
        &self,
        org: &Organization,
        admin: &User,
    ) -> Result<(), StoreError>;

    fn get_organization(&self, id: &OrgId) -> Result<Organization, StoreError>;

    /// Delete a tenant and everything it owns, in dependency order
    /// (audit logs, submissions, sessions, invitations, users, then
    /// the organization itself), inside one write transaction.
    fn delete_organization(&self, id: &OrgId) -> Result<(), StoreError>;
}
