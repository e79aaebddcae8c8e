//! Invitation storage trait.

use crate::StoreError;
use verity_types::{AuditLog, Invitation, InvitationId, OrgId};

/// Trait for storing invitations.
///
/// Lookups by id are tenant-scoped; a cross-tenant id is reported as
/// `NotFound`, indistinguishable from an absent one. Lookup by code is
/// unscoped (the code itself is the credential).
pub trait InvitationStore {
    /// Insert a freshly issued invitation together with its audit
    /// entry. Fails `Duplicate` if the code is already taken (the
    /// caller retries with a new code).
    fn insert_invitation(&self, invitation: &Invitation, audit: &AuditLog)
        -> Result<(), StoreError>;

    /// Tenant-scoped lookup by id.
    fn get_invitation(&self, org_id: &OrgId, id: &InvitationId) -> Result<Invitation, StoreError>;

    /// Unscoped lookup by shareable code.
    fn get_invitation_by_code(&self, code: &str) -> Result<Invitation, StoreError>;

    /// Set `is_active = false`, atomically with its audit entry.
    /// Idempotent: revoking an already-revoked invitation succeeds and
    /// changes nothing (no second audit entry is written).
    fn revoke_invitation(
        &self,
        org_id: &OrgId,
        id: &InvitationId,
        audit: &AuditLog,
    ) -> Result<Invitation, StoreError>;

    /// Tenant-scoped listing, newest first. Returns the total count of
    /// the tenant's invitations alongside the requested page; both are
    /// computed from the same predicate.
    fn list_invitations(
        &self,
        org_id: &OrgId,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<Invitation>), StoreError>;
}
