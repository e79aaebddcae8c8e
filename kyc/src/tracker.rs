//! Session tracker: the customer-facing step machine.
//!
//! A session is opened against a valid invitation code and accumulates
//! step payloads. The step index only moves forward; writing a payload
//! for an index behind the current one is rejected. Once every
//! required payload is present the session flips to `submitted` on its
//! own — there is no separate "mark complete" call for the customer to
//! forget.

use crate::registry::ensure_usable;
use crate::KycError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verity_store::Store;
use verity_types::{
    BiometricData, DocumentData, GeolocationData, IdentityInfo, PhoneVerification, Session,
    SessionId, SessionStatus, Timestamp, VerificationStep,
};

/// A step payload tagged with the step it belongs to. The tag doubles
/// as the wire discriminator, so a payload can never be filed under
/// the wrong step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum StepPayload {
    IdentityInfo(IdentityInfo),
    PhoneVerification(PhoneVerification),
    Document(DocumentData),
    Biometric(BiometricData),
    Geolocation(GeolocationData),
}

impl StepPayload {
    pub fn step(&self) -> VerificationStep {
        match self {
            StepPayload::IdentityInfo(_) => VerificationStep::IdentityInfo,
            StepPayload::PhoneVerification(_) => VerificationStep::PhoneVerification,
            StepPayload::Document(_) => VerificationStep::Document,
            StepPayload::Biometric(_) => VerificationStep::Biometric,
            StepPayload::Geolocation(_) => VerificationStep::Geolocation,
        }
    }
}

/// Customer-facing session operations. Callers hold only the session
/// id; the id is the capability, so no `AuthContext` appears here.
pub struct SessionTracker {
    store: Arc<dyn Store>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Open a fresh session under a shareable invitation code.
    pub fn open(&self, code: &str) -> Result<Session, KycError> {
        let now = Timestamp::now();
        let invitation = self.store.get_invitation_by_code(code)?;
        ensure_usable(&invitation, now)?;

        let session = Session::open(invitation.organization_id, invitation.id, now);
        self.store.insert_session(&session)?;
        tracing::debug!(session = %session.id, "session opened");
        Ok(session)
    }

    /// Record one step payload. Re-validates the invitation first so a
    /// revocation or expiry mid-flow stops the session immediately.
    pub fn write_step(&self, id: &SessionId, payload: StepPayload) -> Result<Session, KycError> {
        let now = Timestamp::now();
        let mut session = self.store.get_session(id)?;

        if !matches!(
            session.status,
            SessionStatus::Pending | SessionStatus::Submitted
        ) {
            return Err(KycError::InvalidTransition {
                from: session.status.as_str().into(),
                to: "step write".into(),
            });
        }

        let invitation = self
            .store
            .get_invitation(&session.organization_id, &session.invitation_id)?;
        ensure_usable(&invitation, now)?;

        let index = payload.step().index();
        if index < session.current_step {
            return Err(KycError::InvalidStep {
                attempted: index,
                current: session.current_step,
            });
        }

        match payload {
            StepPayload::IdentityInfo(data) => session.identity_info = Some(data),
            StepPayload::PhoneVerification(data) => session.phone_verification = Some(data),
            StepPayload::Document(data) => session.document = Some(data),
            StepPayload::Biometric(data) => session.biometric = Some(data),
            StepPayload::Geolocation(data) => session.geolocation = Some(data),
        }
        session.current_step = index;

        if session.status == SessionStatus::Pending && session.required_complete() {
            session.status = SessionStatus::Submitted;
            session.submitted_at = Some(now);
        }

        self.store.update_session(&session)?;
        Ok(session)
    }

    /// Fetch a session by its id.
    pub fn get(&self, id: &SessionId) -> Result<Session, KycError> {
        Ok(self.store.get_session(id)?)
    }

    /// Load a session that is ready to become a submission: it must
    /// have reached `submitted` (or been escalated to review).
    pub fn finalize(&self, id: &SessionId) -> Result<Session, KycError> {
        let session = self.store.get_session(id)?;
        match session.status {
            SessionStatus::Submitted | SessionStatus::NeedsReview => Ok(session),
            other => Err(KycError::InvalidTransition {
                from: other.as_str().into(),
                to: "submission".into(),
            }),
        }
    }
}
