//! Opaque, prefixed entity identifiers.
//!
//! Ids are random and unguessable (`inv_3f9c…`); the prefix makes them
//! self-describing in logs and audit details.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Random lowercase hex string of `bytes * 2` characters.
pub(crate) fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id string (e.g. from a request path).
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{}"), random_hex(16)))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// Tenant (organization) id.
    OrgId, "org");
entity_id!(
    /// Authenticated user id.
    UserId, "usr");
entity_id!(
    /// Invitation id (distinct from the shareable code).
    InvitationId, "inv");
entity_id!(
    /// Verification session id.
    SessionId, "ses");
entity_id!(
    /// Submission id.
    SubmissionId, "sub");
entity_id!(
    /// Audit log entry id.
    AuditLogId, "aud");
entity_id!(
    /// Anonymous customer correlation id.
    CustomerId, "cus");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix() {
        assert!(InvitationId::generate().as_str().starts_with("inv_"));
        assert!(SubmissionId::generate().as_str().starts_with("sub_"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn serde_is_transparent() {
        let id = OrgId::new("org_abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"org_abc\"");
        let back: OrgId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
