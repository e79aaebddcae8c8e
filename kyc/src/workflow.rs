//! Submission workflow: creation from a finalized session and the
//! reviewer-driven state machine.

use crate::notify::{dispatch, Notification, Notifier};
use crate::KycError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verity_risk::RiskSignals;
use verity_store::{ReviewUpdate, Store};
use verity_types::{
    AuditAction, AuditLog, AuthContext, Session, SessionStatus, Submission, SubmissionId,
    SubmissionStatus, TargetType, Timestamp,
};

/// Contact details snapshotted onto the submission. Absent fields fall
/// back to what the session's step payloads declared.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Request provenance recorded alongside the submission.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubmissionMeta {
    pub source_ip: Option<String>,
    pub source_location: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Reviewer- and customer-facing submission operations.
pub struct SubmissionWorkflow {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionWorkflow {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Turn a finalized session into a reviewable submission.
    ///
    /// The risk assessment is computed here, once, from the session's
    /// signals; when no signal is present at all the risk fields stay
    /// unset and the record waits for manual review. Usage accounting,
    /// the one-submission-per-session rule, and the audit entry are
    /// enforced by the store inside one write.
    pub fn create(
        &self,
        session: &Session,
        contact: CustomerContact,
        meta: SubmissionMeta,
    ) -> Result<Submission, KycError> {
        if !matches!(
            session.status,
            SessionStatus::Submitted | SessionStatus::NeedsReview
        ) {
            return Err(KycError::InvalidTransition {
                from: session.status.as_str().into(),
                to: "submission".into(),
            });
        }

        let now = Timestamp::now();
        let signals = RiskSignals::from_session(session);
        let assessment = signals.any_present().then(|| verity_risk::score(&signals));

        let submission = Submission {
            id: SubmissionId::generate(),
            organization_id: session.organization_id.clone(),
            invitation_id: session.invitation_id.clone(),
            kyc_session_id: Some(session.id.clone()),
            customer_name: contact
                .name
                .or_else(|| session.identity_info.as_ref().map(|i| i.full_name.clone())),
            customer_email: contact.email,
            customer_phone: contact.phone.or_else(|| {
                session
                    .phone_verification
                    .as_ref()
                    .map(|p| p.phone.clone())
            }),
            status: SubmissionStatus::Submitted,
            submitted_at: now,
            reviewed_at: None,
            reviewed_by: None,
            notes: None,
            risk_score: assessment.map(|a| a.score),
            risk_level: assessment.map(|a| a.level),
            source_ip: meta.source_ip,
            source_location: meta.source_location,
            metadata: meta.metadata,
        };
        let audit = AuditLog::new(
            session.organization_id.clone(),
            None,
            AuditAction::Create,
            TargetType::Submission,
            Some(submission.id.as_str().to_string()),
            Some(serde_json::json!({
                "invitation_id": session.invitation_id.as_str(),
                "session_id": session.id.as_str(),
            })),
            now,
        );
        self.store.create_submission(session, &submission, &audit)?;
        tracing::info!(
            submission = %submission.id,
            org = %submission.organization_id,
            risk_score = ?submission.risk_score,
            "submission created"
        );

        if let Some(email) = submission.customer_email.clone() {
            dispatch(
                self.notifier.clone(),
                Notification::SubmissionReceived {
                    email,
                    submission_id: submission.id.clone(),
                },
            );
        }
        Ok(submission)
    }

    /// Approve a submission.
    pub fn approve(
        &self,
        ctx: &AuthContext,
        id: &SubmissionId,
        notes: Option<String>,
    ) -> Result<Submission, KycError> {
        let submission =
            self.review(ctx, id, SubmissionStatus::Approved, AuditAction::Approve, notes)?;
        if let Some(email) = submission.customer_email.clone() {
            dispatch(
                self.notifier.clone(),
                Notification::SubmissionApproved {
                    email,
                    submission_id: submission.id.clone(),
                },
            );
        }
        Ok(submission)
    }

    /// Reject a submission with a mandatory reason. The reason is
    /// folded into the notes so the decision record is self-contained.
    pub fn reject(
        &self,
        ctx: &AuthContext,
        id: &SubmissionId,
        reason: &str,
        notes: Option<String>,
    ) -> Result<Submission, KycError> {
        if reason.trim().is_empty() {
            return Err(KycError::BadRequest("a rejection reason is required".into()));
        }
        let combined = format!(
            "Rejection reason: {reason}\n\n{}",
            notes.as_deref().unwrap_or_default()
        );
        let submission = self.review(
            ctx,
            id,
            SubmissionStatus::Rejected,
            AuditAction::Reject,
            Some(combined),
        )?;
        if let Some(email) = submission.customer_email.clone() {
            dispatch(
                self.notifier.clone(),
                Notification::SubmissionRejected {
                    email,
                    submission_id: submission.id.clone(),
                    reason: reason.to_string(),
                },
            );
        }
        Ok(submission)
    }

    /// Park a submission for senior review.
    pub fn escalate(
        &self,
        ctx: &AuthContext,
        id: &SubmissionId,
        notes: Option<String>,
    ) -> Result<Submission, KycError> {
        self.review(
            ctx,
            id,
            SubmissionStatus::NeedsReview,
            AuditAction::Escalate,
            notes,
        )
    }

    /// Archive a submission. Allowed from any state; the review fields
    /// of a decided submission are preserved.
    pub fn archive(&self, ctx: &AuthContext, id: &SubmissionId) -> Result<Submission, KycError> {
        self.review(ctx, id, SubmissionStatus::Archived, AuditAction::Archive, None)
    }

    fn review(
        &self,
        ctx: &AuthContext,
        id: &SubmissionId,
        to: SubmissionStatus,
        action: AuditAction,
        notes: Option<String>,
    ) -> Result<Submission, KycError> {
        let now = Timestamp::now();
        let update = ReviewUpdate {
            to,
            reviewed_at: now,
            reviewed_by: Some(ctx.user_id.clone()),
            notes,
        };
        let audit = AuditLog::new(
            ctx.org_id.clone(),
            Some(ctx.user_id.clone()),
            action,
            TargetType::Submission,
            Some(id.as_str().to_string()),
            Some(serde_json::json!({ "to": to })),
            now,
        );
        let submission = self.store.apply_review(&ctx.org_id, id, &update, &audit)?;
        tracing::info!(submission = %id, org = %ctx.org_id, status = %to, "review applied");
        Ok(submission)
    }

    /// Tenant-scoped fetch by id.
    pub fn get(&self, ctx: &AuthContext, id: &SubmissionId) -> Result<Submission, KycError> {
        Ok(self.store.get_submission(&ctx.org_id, id)?)
    }

    /// Tenant-scoped page, newest first, optionally filtered by status.
    pub fn list(
        &self,
        ctx: &AuthContext,
        status: Option<SubmissionStatus>,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<Submission>), KycError> {
        Ok(self.store.list_submissions(&ctx.org_id, status, skip, limit)?)
    }
}
