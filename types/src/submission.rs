//! Submission — the immutable-after-creation reviewable snapshot of a
//! completed session.

use crate::{InvitationId, OrgId, SessionId, SubmissionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discretized risk band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Green,
    Amber,
    Red,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Green => f.write_str("green"),
            RiskLevel::Amber => f.write_str("amber"),
            RiskLevel::Red => f.write_str("red"),
        }
    }
}

/// Review status of a submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Submitted,
    Approved,
    Rejected,
    NeedsReview,
    Archived,
}

impl SubmissionStatus {
    /// Approved and rejected are final review decisions; compliance
    /// history must not change once decided.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }

    /// Whether a review transition from `self` to `to` is legal.
    /// Archiving is administrative and allowed from any state.
    pub fn can_transition_to(&self, to: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        if to == Archived {
            return true;
        }
        matches!(
            (*self, to),
            (Submitted, Approved)
                | (Submitted, Rejected)
                | (Submitted, NeedsReview)
                | (NeedsReview, Approved)
                | (NeedsReview, Rejected)
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::NeedsReview => "needs_review",
            SubmissionStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

/// A reviewable submission record.
///
/// Contact fields are snapshotted at submit time; after creation only
/// the review transition mutates the record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub organization_id: OrgId,
    pub invitation_id: InvitationId,
    pub kyc_session_id: Option<SessionId>,

    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,

    pub status: SubmissionStatus,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub reviewed_by: Option<UserId>,
    pub notes: Option<String>,

    /// 0–100 inclusive; unset when no risk signal was available at
    /// creation (pending manual review).
    pub risk_score: Option<u8>,
    pub risk_level: Option<RiskLevel>,

    pub source_ip: Option<String>,
    pub source_location: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_reject_review() {
        use SubmissionStatus::*;
        for to in [Approved, Rejected, NeedsReview, Submitted] {
            assert!(!Approved.can_transition_to(to));
            assert!(!Rejected.can_transition_to(to));
        }
    }

    #[test]
    fn needs_review_resolves() {
        use SubmissionStatus::*;
        assert!(NeedsReview.can_transition_to(Approved));
        assert!(NeedsReview.can_transition_to(Rejected));
        assert!(!NeedsReview.can_transition_to(Submitted));
    }

    #[test]
    fn anything_can_be_archived() {
        use SubmissionStatus::*;
        for from in [Submitted, Approved, Rejected, NeedsReview, Archived] {
            assert!(from.can_transition_to(Archived));
        }
    }

    #[test]
    fn statuses_serialize_snake_case() {
        let json = serde_json::to_string(&SubmissionStatus::NeedsReview).unwrap();
        assert_eq!(json, "\"needs_review\"");
    }
}
