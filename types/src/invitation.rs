//! Invitation entity — the tenant-issued credential gating one KYC
//! workflow instance.

use crate::{InvitationId, OrgId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A time- and usage-bounded invitation.
///
/// Mutated only by usage increment (at submission creation) and revoke.
/// Never physically deleted while sessions or submissions reference it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    /// Unique, unguessable shareable code.
    pub code: String,
    pub organization_id: OrgId,
    pub name: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub is_active: bool,
    pub created_by: Option<UserId>,
    pub created_at: Timestamp,
}

impl Invitation {
    /// Whether the expiry deadline (if any) has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at.is_past(now))
    }

    /// Whether the usage limit (if any) has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.usage_count >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(limit: Option<u32>, count: u32, expires_at: Option<Timestamp>) -> Invitation {
        Invitation {
            id: InvitationId::generate(),
            code: "KYC0011223344".into(),
            organization_id: OrgId::generate(),
            name: None,
            expires_at,
            usage_limit: limit,
            usage_count: count,
            is_active: true,
            created_by: None,
            created_at: Timestamp::new(0),
        }
    }

    #[test]
    fn unlimited_invitation_never_exhausts() {
        assert!(!invitation(None, 10_000, None).is_exhausted());
    }

    #[test]
    fn exhausted_at_limit() {
        assert!(!invitation(Some(3), 2, None).is_exhausted());
        assert!(invitation(Some(3), 3, None).is_exhausted());
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let inv = invitation(None, 0, Some(Timestamp::new(1_000)));
        assert!(!inv.is_expired(Timestamp::new(999)));
        assert!(!inv.is_expired(Timestamp::new(1_000)));
        assert!(inv.is_expired(Timestamp::new(1_001)));
    }
}
