//! KYC engines: invitations, verification sessions, submissions, and
//! the audit trail.
//!
//! Each engine is a thin stateless layer over the storage traits. The
//! invariants that need atomicity (usage accounting, review
//! transitions) live in the store's compound operations; the engines
//! own sequencing, validation order, risk scoring, and notifications.

pub mod audit;
pub mod code;
pub mod error;
pub mod notify;
pub mod registry;
pub mod tracker;
pub mod workflow;

pub use audit::AuditRecorder;
pub use error::KycError;
pub use notify::{Notification, Notifier, NotifyError, TraceNotifier};
pub use registry::{ensure_usable, InvitationRegistry, IssueInvitation, DEFAULT_EXPIRY_DAYS};
pub use tracker::{SessionTracker, StepPayload};
pub use workflow::{CustomerContact, SubmissionMeta, SubmissionWorkflow};
