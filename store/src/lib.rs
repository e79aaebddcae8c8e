//! Abstract storage traits for the Verity KYC platform.
//!
//! Every backend implements these traits; the rest of the codebase
//! depends only on them. Operations that carry invariants — usage
//! accounting, review transitions, tenant deletion — are expressed as
//! single compound methods so a backend can execute them inside one
//! write transaction. Audit entries are parameters of those compound
//! methods: the trail is written in the same transaction as the state
//! change it documents, and a failed audit write fails the operation.

pub mod audit;
pub mod error;
pub mod invitation;
pub mod organization;
pub mod session;
pub mod submission;
pub mod user;

pub use audit::AuditStore;
pub use error::StoreError;
pub use invitation::InvitationStore;
pub use organization::OrganizationStore;
pub use session::SessionStore;
pub use submission::{ReviewUpdate, SubmissionStore};
pub use user::UserStore;

/// The full storage surface a backend must provide.
pub trait Store:
    OrganizationStore
    + UserStore
    + InvitationStore
    + SessionStore
    + SubmissionStore
    + AuditStore
    + Send
    + Sync
{
}

impl<T> Store for T where
    T: OrganizationStore
        + UserStore
        + InvitationStore
        + SessionStore
        + SubmissionStore
        + AuditStore
        + Send
        + Sync
{
}
