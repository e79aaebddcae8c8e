//! Append-only audit trail entries.

use crate::{AuditLogId, OrgId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state-changing action being documented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Revoke,
    Approve,
    Reject,
    Escalate,
    Archive,
    Delete,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditAction::Create => "create",
            AuditAction::Revoke => "revoke",
            AuditAction::Approve => "approve",
            AuditAction::Reject => "reject",
            AuditAction::Escalate => "escalate",
            AuditAction::Archive => "archive",
            AuditAction::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// The entity type the action targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Invitation,
    Session,
    Submission,
    Organization,
    User,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetType::Invitation => "invitation",
            TargetType::Session => "session",
            TargetType::Submission => "submission",
            TargetType::Organization => "organization",
            TargetType::User => "user",
        };
        f.write_str(s)
    }
}

/// One immutable audit trail entry, keyed by tenant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub organization_id: OrgId,
    pub user_id: Option<UserId>,
    pub action: AuditAction,
    pub target_type: TargetType,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

impl AuditLog {
    pub fn new(
        organization_id: OrgId,
        user_id: Option<UserId>,
        action: AuditAction,
        target_type: TargetType,
        target_id: Option<String>,
        details: Option<serde_json::Value>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: AuditLogId::generate(),
            organization_id,
            user_id,
            action,
            target_type,
            target_id,
            details,
            created_at: now,
        }
    }
}
