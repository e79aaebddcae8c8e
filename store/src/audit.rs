//! Audit trail storage trait.

use crate::StoreError;
use verity_types::{AuditLog, OrgId};

/// Trait for the append-only audit trail.
///
/// Entries written as part of a compound operation go through that
/// operation's transaction; this trait covers standalone appends and
/// reads. There is no update or delete — entries are immutable.
pub trait AuditStore {
    fn append_audit(&self, entry: &AuditLog) -> Result<(), StoreError>;

    /// Tenant-scoped listing, newest first.
    fn list_audit(
        &self,
        org_id: &OrgId,
        skip: usize,
        limit: usize,
    ) -> Result<(u64, Vec<AuditLog>), StoreError>;
}
