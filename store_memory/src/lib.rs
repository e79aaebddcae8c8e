//! In-process storage backend.
//!
//! One `RwLock` guards all tables, so every mutating operation runs as
//! a serializable write transaction: compound operations validate
//! everything while holding the exclusive guard and only then mutate,
//! which makes the usage-count compare-and-swap and the review
//! transition race-safe. This is the reference backend for tests and
//! the daemon's dev mode; durable backends implement the same traits.

mod world;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use verity_store::{
    AuditStore, InvitationStore, OrganizationStore, ReviewUpdate, SessionStore, StoreError,
    SubmissionStore, UserStore,
};
use verity_types::{
    AuditLog, Invitation, InvitationId, OrgId, Organization, Session, SessionId, Submission,
    SubmissionId, SubmissionStatus, User, UserId,
};

use world::World;

/// The in-memory store. Cheap to construct; cloneable via `Arc` at the
/// call sites that share it.
#[derive(Default)]
pub struct MemoryStore {
    world: RwLock<World>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, World>, StoreError> {
        self.world
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, World>, StoreError> {
        self.world
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }
}

impl OrganizationStore for MemoryStore {
    fn create_organization_with_admin(
        &self,
        org: &Organization,
        admin: &User,
    ) -> Result<(), StoreError> {
        let mut w = self.write()?;
        if w.users_by_email.contains_key(&admin.email) {
            return Err(StoreError::Duplicate(admin.email.clone()));
        }
        w.organizations.insert(org.id.clone(), org.clone());
        w.users_by_email
            .insert(admin.email.clone(), admin.id.clone());
        w.users.insert(admin.id.clone(), admin.clone());
        Ok(())
    }

    fn get_organization(&self, id: &OrgId) -> Result<Organization, StoreError> {
        let r = self.read()?;
        r.organizations
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn delete_organization(&self, id: &OrgId) -> Result<(), StoreError> {
        let mut w = self.write()?;
        if w.organizations.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        // Children go in dependency order: audit logs, submissions,
        // sessions, invitations, users.
        w.audit_logs.retain(|a| &a.organization_id != id);
        let gone_subs: Vec<SubmissionId> = w
            .submissions
            .values()
            .filter(|s| &s.organization_id == id)
            .map(|s| s.id.clone())
            .collect();
        for sub_id in &gone_subs {
            w.submissions.remove(sub_id);
        }
        w.submissions_by_session
            .retain(|_, sub_id| !gone_subs.contains(sub_id));
        w.sessions.retain(|_, s| &s.organization_id != id);
        let gone_codes: Vec<String> = w
            .invitations
            .values()
            .filter(|i| &i.organization_id == id)
            .map(|i| i.code.clone())
            .collect();
        for code in &gone_codes {
            if let Some(inv_id) = w.invitations_by_code.remove(code) {
                w.invitations.remove(&inv_id);
            }
        }
        let gone_emails: Vec<String> = w
            .users
            .values()
            .filter(|u| &u.organization_id == id)
            .map(|u| u.email.clone())
            .collect();
        for email in &gone_emails {
            if let Some(user_id) = w.users_by_email.remove(email) {
                w.users.remove(&user_id);
            }
        }
        Ok(())
    }
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut w = self.write()?;
        if w.users_by_email.contains_key(&user.email) {
            return Err(StoreError::Duplicate(user.email.clone()));
        }
        w.users_by_email.insert(user.email.clone(), user.id.clone());
        w.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn get_user(&self, id: &UserId) -> Result<User, StoreError> {
        let r = self.read()?;
        r.users
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let r = self.read()?;
        let id = r
            .users_by_email
            .get(email)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))?;
        r.users
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(email.to_string()))
    }
}

impl InvitationStore for MemoryStore {
    fn insert_invitation(
        &self,
        invitation: &Invitation,
        audit: &AuditLog,
    ) -> Result<(), StoreError> {
        let mut w = self.write()?;
        if w.invitations_by_code.contains_key(&invitation.code) {
            return Err(StoreError::Duplicate(invitation.code.clone()));
        }
        w.invitations_by_code
            .insert(invitation.code.clone(), invitation.id.clone());
        w.invitations
            .insert(invitation.id.clone(), invitation.clone());
        w.audit_logs.push(audit.clone());
        Ok(())
    }

    fn get_invitation(&self, org_id: &OrgId, id: &InvitationId) -> Result<Invitation, StoreError> {
        let r = self.read()?;
        r.invitations
            .get(id)
            .filter(|inv| &inv.organization_id == org_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_invitation_by_code(&self, code: &str) -> Result<Invitation, StoreError> {
        let r = self.read()?;
        r.invitations_by_code
            .get(code)
            .and_then(|id| r.invitations.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    fn revoke_invitation(
        &self,
        org_id: &OrgId,
        id: &InvitationId,
        audit: &AuditLog,
    ) -> Result<Invitation, StoreError> {
        let mut w = self.write()?;
        let inv = w
            .invitations
            .get_mut(id)
            .filter(|inv| &inv.organization_id == org_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if inv.is_active {
            inv.is_active = false;
            let revoked = inv.clone();
            w.audit_logs.push(audit.clone());
            Ok(revoked)
        } else {
            Ok(inv.clone())
        }
    }

    fn list_invitations(
        &self,
        org_id: &OrgId,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<Invitation>), StoreError> {
        let r = self.read()?;
        let mut items: Vec<Invitation> = r
            .invitations
            .values()
            .filter(|inv| &inv.organization_id == org_id)
            .cloned()
            .collect();
        let total = items.len() as u64;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok((total, items.into_iter().skip(skip).take(limit).collect()))
    }
}

impl SessionStore for MemoryStore {
    fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut w = self.write()?;
        if w.sessions.contains_key(&session.id) {
            return Err(StoreError::Duplicate(session.id.to_string()));
        }
        w.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn get_session(&self, id: &SessionId) -> Result<Session, StoreError> {
        let r = self.read()?;
        r.sessions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut w = self.write()?;
        if !w.sessions.contains_key(&session.id) {
            return Err(StoreError::NotFound(session.id.to_string()));
        }
        w.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}

impl SubmissionStore for MemoryStore {
    fn create_submission(
        &self,
        session: &Session,
        submission: &Submission,
        audit: &AuditLog,
    ) -> Result<(), StoreError> {
        let mut w = self.write()?;

        // Validate everything before mutating anything; the exclusive
        // guard makes the whole block one transaction.
        if w.submissions_by_session.contains_key(&session.id) {
            return Err(StoreError::Duplicate(session.id.to_string()));
        }
        if w.submissions.contains_key(&submission.id) {
            return Err(StoreError::Duplicate(submission.id.to_string()));
        }
        let inv = w
            .invitations
            .get_mut(&submission.invitation_id)
            .ok_or_else(|| StoreError::NotFound(submission.invitation_id.to_string()))?;
        // The invitation must still be usable at the submission
        // instant; a revocation or expiry after the session's last
        // step write lands here.
        if !inv.is_active {
            return Err(StoreError::Revoked);
        }
        if inv.is_expired(submission.submitted_at) {
            return Err(StoreError::Expired);
        }
        if inv
            .usage_limit
            .is_some_and(|limit| inv.usage_count >= limit)
        {
            return Err(StoreError::UsageExceeded);
        }
        inv.usage_count += 1;
        w.sessions.insert(session.id.clone(), session.clone());
        w.submissions_by_session
            .insert(session.id.clone(), submission.id.clone());
        w.submissions
            .insert(submission.id.clone(), submission.clone());
        w.audit_logs.push(audit.clone());
        Ok(())
    }

    fn get_submission(&self, org_id: &OrgId, id: &SubmissionId) -> Result<Submission, StoreError> {
        let r = self.read()?;
        r.submissions
            .get(id)
            .filter(|s| &s.organization_id == org_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_submissions(
        &self,
        org_id: &OrgId,
        status: Option<SubmissionStatus>,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<Submission>), StoreError> {
        let r = self.read()?;
        let mut items: Vec<Submission> = r
            .submissions
            .values()
            .filter(|s| &s.organization_id == org_id)
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .cloned()
            .collect();
        let total = items.len() as u64;
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok((total, items.into_iter().skip(skip).take(limit).collect()))
    }

    fn apply_review(
        &self,
        org_id: &OrgId,
        id: &SubmissionId,
        update: &ReviewUpdate,
        audit: &AuditLog,
    ) -> Result<Submission, StoreError> {
        let mut w = self.write()?;
        let sub = w
            .submissions
            .get_mut(id)
            .filter(|s| &s.organization_id == org_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !sub.status.can_transition_to(update.to) {
            return Err(StoreError::InvalidTransition {
                from: sub.status,
                to: update.to,
            });
        }
        sub.status = update.to;
        sub.reviewed_at = Some(update.reviewed_at);
        sub.reviewed_by = update.reviewed_by.clone();
        sub.notes = update.notes.clone();
        let updated = sub.clone();
        w.audit_logs.push(audit.clone());
        Ok(updated)
    }
}

impl AuditStore for MemoryStore {
    fn append_audit(&self, entry: &AuditLog) -> Result<(), StoreError> {
        let mut w = self.write()?;
        w.audit_logs.push(entry.clone());
        Ok(())
    }

    fn list_audit(
        &self,
        org_id: &OrgId,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<AuditLog>), StoreError> {
        let r = self.read()?;
        let mut items: Vec<AuditLog> = r
            .audit_logs
            .iter()
            .filter(|a| &a.organization_id == org_id)
            .cloned()
            .collect();
        let total = items.len() as u64;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok((total, items.into_iter().skip(skip).take(limit).collect()))
    }
}
