//! Invitation registry: issuance, validation, revocation, listing.

use crate::code::generate_code;
use crate::KycError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verity_store::{Store, StoreError};
use verity_types::{
    AuditAction, AuditLog, AuthContext, Invitation, InvitationId, TargetType, Timestamp,
};

/// Invitations expire 90 days after issuance unless the issuer says
/// otherwise.
pub const DEFAULT_EXPIRY_DAYS: u64 = 90;

/// How many code collisions to tolerate before giving up. With 40 bits
/// of entropy this bound is effectively never reached.
const MAX_CODE_ATTEMPTS: u32 = 8;

/// Issuance parameters supplied by the tenant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IssueInvitation {
    pub name: Option<String>,
    pub usage_limit: Option<u32>,
    /// Absolute expiry; when absent, `DEFAULT_EXPIRY_DAYS` applies.
    pub expires_at: Option<Timestamp>,
}

/// Check that an invitation can still admit a customer, in the fixed
/// precedence order: revoked before expired before exhausted, so a
/// caller always learns the most fundamental defect first.
pub fn ensure_usable(invitation: &Invitation, now: Timestamp) -> Result<(), KycError> {
    if !invitation.is_active {
        return Err(KycError::Revoked);
    }
    if invitation.is_expired(now) {
        return Err(KycError::Expired);
    }
    if invitation.is_exhausted() {
        return Err(KycError::UsageExceeded);
    }
    Ok(())
}

/// Tenant-facing invitation operations over the store.
pub struct InvitationRegistry {
    store: Arc<dyn Store>,
}

impl InvitationRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Issue a new invitation for the caller's tenant. The invitation
    /// and its audit entry are written in one unit; a code collision
    /// is retried with a fresh code.
    pub fn issue(&self, ctx: &AuthContext, req: IssueInvitation) -> Result<Invitation, KycError> {
        let now = Timestamp::now();
        let expires_at = req
            .expires_at
            .unwrap_or_else(|| now.plus_days(DEFAULT_EXPIRY_DAYS));

        for _ in 0..MAX_CODE_ATTEMPTS {
            let invitation = Invitation {
                id: InvitationId::generate(),
                code: generate_code(),
                organization_id: ctx.org_id.clone(),
                name: req.name.clone(),
                expires_at: Some(expires_at),
                usage_limit: req.usage_limit,
                usage_count: 0,
                is_active: true,
                created_by: Some(ctx.user_id.clone()),
                created_at: now,
            };
            let audit = AuditLog::new(
                ctx.org_id.clone(),
                Some(ctx.user_id.clone()),
                AuditAction::Create,
                TargetType::Invitation,
                Some(invitation.id.as_str().to_string()),
                Some(serde_json::json!({ "code": invitation.code })),
                now,
            );
            match self.store.insert_invitation(&invitation, &audit) {
                Ok(()) => {
                    tracing::info!(invitation = %invitation.id, org = %ctx.org_id, "invitation issued");
                    return Ok(invitation);
                }
                Err(StoreError::Duplicate(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(KycError::Storage(
            "could not allocate a unique invitation code".into(),
        ))
    }

    /// Validate a shareable code for a prospective customer.
    pub fn validate(&self, code: &str) -> Result<Invitation, KycError> {
        self.validate_at(code, Timestamp::now())
    }

    /// Validation at an explicit instant; the clock is a parameter so
    /// boundary behavior is testable.
    pub fn validate_at(&self, code: &str, now: Timestamp) -> Result<Invitation, KycError> {
        let invitation = self.store.get_invitation_by_code(code)?;
        ensure_usable(&invitation, now)?;
        Ok(invitation)
    }

    /// Revoke an invitation. Admin-only; idempotent.
    pub fn revoke(&self, ctx: &AuthContext, id: &InvitationId) -> Result<Invitation, KycError> {
        if !ctx.is_admin() {
            return Err(KycError::Forbidden);
        }
        let now = Timestamp::now();
        let audit = AuditLog::new(
            ctx.org_id.clone(),
            Some(ctx.user_id.clone()),
            AuditAction::Revoke,
            TargetType::Invitation,
            Some(id.as_str().to_string()),
            None,
            now,
        );
        let invitation = self.store.revoke_invitation(&ctx.org_id, id, &audit)?;
        tracing::info!(invitation = %id, org = %ctx.org_id, "invitation revoked");
        Ok(invitation)
    }

    /// Tenant-scoped fetch by id.
    pub fn get(&self, ctx: &AuthContext, id: &InvitationId) -> Result<Invitation, KycError> {
        Ok(self.store.get_invitation(&ctx.org_id, id)?)
    }

    /// Tenant-scoped page, newest first, with the total count.
    pub fn list(
        &self,
        ctx: &AuthContext,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<Invitation>), KycError> {
        Ok(self.store.list_invitations(&ctx.org_id, skip, limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> Invitation {
        Invitation {
            id: InvitationId::generate(),
            code: generate_code(),
            organization_id: verity_types::OrgId::generate(),
            name: None,
            expires_at: Some(Timestamp::new(1_000)),
            usage_limit: Some(1),
            usage_count: 0,
            is_active: true,
            created_by: None,
            created_at: Timestamp::new(0),
        }
    }

    #[test]
    fn revoked_wins_over_expired_and_exhausted() {
        let mut inv = invitation();
        inv.is_active = false;
        inv.usage_count = 1;
        let err = ensure_usable(&inv, Timestamp::new(2_000)).unwrap_err();
        assert!(matches!(err, KycError::Revoked));
    }

    #[test]
    fn expired_wins_over_exhausted() {
        let mut inv = invitation();
        inv.usage_count = 1;
        let err = ensure_usable(&inv, Timestamp::new(2_000)).unwrap_err();
        assert!(matches!(err, KycError::Expired));
    }

    #[test]
    fn usable_at_the_expiry_instant() {
        let inv = invitation();
        assert!(ensure_usable(&inv, Timestamp::new(1_000)).is_ok());
        assert!(matches!(
            ensure_usable(&inv, Timestamp::new(1_001)),
            Err(KycError::Expired)
        ));
    }
}
