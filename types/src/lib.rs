//! Core domain types shared across the Verity workspace.
//!
//! Everything here is plain data: entity records, status enums with
//! their transition rules, and the small value types (ids, timestamps)
//! the rest of the platform is written in terms of.

pub mod audit;
pub mod context;
pub mod id;
pub mod invitation;
pub mod org;
pub mod session;
pub mod submission;
pub mod time;
pub mod user;

pub use audit::{AuditAction, AuditLog, TargetType};
pub use context::AuthContext;
pub use id::{AuditLogId, CustomerId, InvitationId, OrgId, SessionId, SubmissionId, UserId};
pub use invitation::Invitation;
pub use org::{Organization, Plan};
pub use session::{
    BiometricData, DocumentData, GeolocationData, IdentityInfo, PhoneVerification, Session,
    SessionStatus, UnknownStep, VerificationStep,
};
pub use submission::{RiskLevel, Submission, SubmissionStatus};
pub use time::Timestamp;
pub use user::{Role, User};
