use thiserror::Error;
use verity_types::SubmissionStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("invitation revoked")]
    Revoked,

    #[error("invitation expired")]
    Expired,

    #[error("invitation usage limit reached")]
    UsageExceeded,

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("storage backend error: {0}")]
    Backend(String),
}
