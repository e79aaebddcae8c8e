//! Standalone audit trail access.
//!
//! State-changing engine operations write their audit entries through
//! the store's compound methods, in the same transaction as the change
//! itself. This recorder covers the rest: entries for operations that
//! have no compound store method (account registration, tenant
//! deletion) and tenant-scoped reads of the trail.

use crate::KycError;
use std::sync::Arc;
use verity_store::Store;
use verity_types::{AuditAction, AuditLog, AuthContext, OrgId, TargetType, Timestamp, UserId};

pub struct AuditRecorder {
    store: Arc<dyn Store>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Append one entry outside any compound operation.
    pub fn record(
        &self,
        org_id: OrgId,
        user_id: Option<UserId>,
        action: AuditAction,
        target_type: TargetType,
        target_id: Option<String>,
        details: Option<serde_json::Value>,
    ) -> Result<(), KycError> {
        let entry = AuditLog::new(
            org_id,
            user_id,
            action,
            target_type,
            target_id,
            details,
            Timestamp::now(),
        );
        Ok(self.store.append_audit(&entry)?)
    }

    /// Tenant-scoped page of the trail, newest first.
    pub fn list(
        &self,
        ctx: &AuthContext,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<AuditLog>), KycError> {
        Ok(self.store.list_audit(&ctx.org_id, skip, limit)?)
    }
}
