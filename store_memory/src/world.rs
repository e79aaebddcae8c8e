//! The backing tables.

use std::collections::HashMap;
use verity_types::{
    AuditLog, Invitation, InvitationId, OrgId, Organization, Session, SessionId, Submission,
    SubmissionId, User, UserId,
};

/// All tables behind the store's single lock. Secondary indexes
/// (code, email, session linkage) are kept in step with the primary
/// maps by the store's compound operations.
#[derive(Default)]
pub(crate) struct World {
    pub organizations: HashMap<OrgId, Organization>,
    pub users: HashMap<UserId, User>,
    pub users_by_email: HashMap<String, UserId>,
    pub invitations: HashMap<InvitationId, Invitation>,
    pub invitations_by_code: HashMap<String, InvitationId>,
    pub sessions: HashMap<SessionId, Session>,
    pub submissions: HashMap<SubmissionId, Submission>,
    pub submissions_by_session: HashMap<SessionId, SubmissionId>,
    pub audit_logs: Vec<AuditLog>,
}
