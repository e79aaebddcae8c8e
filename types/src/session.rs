//! Verification session — the working record of one in-progress
//! verification, accumulating step payloads under a single invitation.

use crate::{CustomerId, InvitationId, OrgId, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status of a verification session.
///
/// Transitions are monotone forward, except that `NeedsReview` may
/// still resolve to `Approved` or `Rejected`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
    NeedsReview,
}

impl SessionStatus {
    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Approved | SessionStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Submitted => "submitted",
            SessionStatus::Approved => "approved",
            SessionStatus::Rejected => "rejected",
            SessionStatus::NeedsReview => "needs_review",
        }
    }

    /// Whether moving from `self` to `to` is a legal forward transition.
    pub fn can_advance_to(&self, to: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (*self, to),
            (Pending, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Submitted, NeedsReview)
                | (NeedsReview, Approved)
                | (NeedsReview, Rejected)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five payload-bearing verification steps, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStep {
    IdentityInfo,
    PhoneVerification,
    Document,
    Biometric,
    Geolocation,
}

impl VerificationStep {
    /// 1-based position in the step sequence.
    pub fn index(&self) -> u32 {
        match self {
            VerificationStep::IdentityInfo => 1,
            VerificationStep::PhoneVerification => 2,
            VerificationStep::Document => 3,
            VerificationStep::Biometric => 4,
            VerificationStep::Geolocation => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStep::IdentityInfo => "identity_info",
            VerificationStep::PhoneVerification => "phone_verification",
            VerificationStep::Document => "document",
            VerificationStep::Biometric => "biometric",
            VerificationStep::Geolocation => "geolocation",
        }
    }
}

impl fmt::Display for VerificationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown verification step: {0}")]
pub struct UnknownStep(pub String);

impl FromStr for VerificationStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity_info" => Ok(VerificationStep::IdentityInfo),
            "phone_verification" => Ok(VerificationStep::PhoneVerification),
            "document" => Ok(VerificationStep::Document),
            "biometric" => Ok(VerificationStep::Biometric),
            "geolocation" => Ok(VerificationStep::Geolocation),
            other => Err(UnknownStep(other.to_string())),
        }
    }
}

// ── Step payloads ──────────────────────────────────────────────────────
//
// Explicit optional fields per step; unknown keys are rejected at the
// boundary rather than silently accepted.

/// Customer-declared identity details.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityInfo {
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub residential_address: Option<String>,
}

/// Outcome of the one-time-code phone check.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneVerification {
    pub phone: String,
    pub verified: bool,
    pub verified_at: Option<Timestamp>,
}

/// Identity document capture. The binary content lives in the external
/// object store; only its key is recorded here.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentData {
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub expiry_date: Option<String>,
    pub file_key: Option<String>,
    /// Document authenticity confidence in [0, 1], from the OCR /
    /// forensics producer.
    pub authenticity: Option<f64>,
}

/// Selfie / liveness capture results.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BiometricData {
    pub selfie_key: Option<String>,
    /// Face match confidence in [0, 1] against the document portrait.
    pub face_match_score: Option<f64>,
    pub liveness_score: Option<f64>,
    pub deepfake_detected: Option<bool>,
}

/// Device geolocation at capture time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeolocationData {
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    /// Agreement in [0, 1] between GPS location and declared address.
    pub gps_match: Option<f64>,
}

/// A verification session. One session maps to at most one submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub organization_id: OrgId,
    pub invitation_id: InvitationId,
    pub customer_id: CustomerId,
    pub status: SessionStatus,
    /// Highest completed step index; never decreases.
    pub current_step: u32,
    pub identity_info: Option<IdentityInfo>,
    pub phone_verification: Option<PhoneVerification>,
    pub document: Option<DocumentData>,
    pub biometric: Option<BiometricData>,
    pub geolocation: Option<GeolocationData>,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Session {
    /// Open a fresh pending session under an invitation.
    pub fn open(organization_id: OrgId, invitation_id: InvitationId, now: Timestamp) -> Self {
        Self {
            id: SessionId::generate(),
            organization_id,
            invitation_id,
            customer_id: CustomerId::generate(),
            status: SessionStatus::Pending,
            current_step: 0,
            identity_info: None,
            phone_verification: None,
            document: None,
            biometric: None,
            geolocation: None,
            submitted_at: None,
            created_at: now,
        }
    }

    /// Whether every required step payload is present.
    ///
    /// Identity info is the only required payload; the remaining steps
    /// are optional enrichments that feed risk signals when present.
    pub fn required_complete(&self) -> bool {
        self.identity_info.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_only_advances_to_submitted() {
        use SessionStatus::*;
        assert!(Pending.can_advance_to(Submitted));
        assert!(!Pending.can_advance_to(Approved));
        assert!(!Pending.can_advance_to(Rejected));
        assert!(!Pending.can_advance_to(NeedsReview));
    }

    #[test]
    fn needs_review_resolves_both_ways() {
        use SessionStatus::*;
        assert!(NeedsReview.can_advance_to(Approved));
        assert!(NeedsReview.can_advance_to(Rejected));
        assert!(!NeedsReview.can_advance_to(Submitted));
    }

    #[test]
    fn terminal_statuses_admit_nothing() {
        use SessionStatus::*;
        for to in [Pending, Submitted, Approved, Rejected, NeedsReview] {
            assert!(!Approved.can_advance_to(to));
            assert!(!Rejected.can_advance_to(to));
        }
    }

    #[test]
    fn step_indices_are_ordered() {
        use VerificationStep::*;
        let steps = [IdentityInfo, PhoneVerification, Document, Biometric, Geolocation];
        for pair in steps.windows(2) {
            assert!(pair[0].index() < pair[1].index());
        }
    }

    #[test]
    fn step_names_round_trip() {
        use VerificationStep::*;
        for step in [IdentityInfo, PhoneVerification, Document, Biometric, Geolocation] {
            assert_eq!(step.as_str().parse::<VerificationStep>().unwrap(), step);
        }
        assert!("selfie".parse::<VerificationStep>().is_err());
    }

    #[test]
    fn identity_payload_rejects_unknown_keys() {
        let err = serde_json::from_str::<IdentityInfo>(
            r#"{"full_name":"Ada Lovelace","shoe_size":42}"#,
        );
        assert!(err.is_err());
    }
}
