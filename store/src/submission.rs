//! Submission storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use verity_types::{
    AuditLog, OrgId, Session, Submission, SubmissionId, SubmissionStatus, Timestamp, UserId,
};

/// The mutation applied by a review transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub to: SubmissionStatus,
    pub reviewed_at: Timestamp,
    pub reviewed_by: Option<UserId>,
    pub notes: Option<String>,
}

/// Trait for storing submissions.
pub trait SubmissionStore {
    /// Create a submission from a finalized session, as one atomic
    /// unit of work:
    ///
    /// 1. re-check the invitation is still usable (active, unexpired
    ///    as of the submission instant, under its usage limit) and
    ///    increment its count (compare-and-swap; a losing concurrent
    ///    writer observes `Revoked`, `Expired` or `UsageExceeded` and
    ///    nothing is written),
    /// 2. enforce at most one submission per session (`Duplicate`),
    /// 3. persist the session snapshot and the submission,
    /// 4. append the audit entry.
    fn create_submission(
        &self,
        session: &Session,
        submission: &Submission,
        audit: &AuditLog,
    ) -> Result<(), StoreError>;

    /// Tenant-scoped lookup. Cross-tenant ids are `NotFound`.
    fn get_submission(&self, org_id: &OrgId, id: &SubmissionId) -> Result<Submission, StoreError>;

    /// Tenant-scoped listing, newest first, optionally filtered by
    /// status. The total and the page are computed from the same
    /// filtered predicate.
    fn list_submissions(
        &self,
        org_id: &OrgId,
        status: Option<SubmissionStatus>,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<Submission>), StoreError>;

    /// Apply a review transition atomically: the current status is
    /// read and checked against the transition rules under the same
    /// write transaction that stores the new status, so a second
    /// concurrent reviewer observes `InvalidTransition` rather than
    /// overwriting a committed decision. The audit entry is written in
    /// the same transaction.
    fn apply_review(
        &self,
        org_id: &OrgId,
        id: &SubmissionId,
        update: &ReviewUpdate,
        audit: &AuditLog,
    ) -> Result<Submission, StoreError>;
}
