use thiserror::Error;
use verity_store::StoreError;

/// Errors surfaced by the KYC engines.
///
/// Variants map one-to-one onto response classes at the RPC boundary;
/// anything a caller can act on gets its own variant rather than a
/// stringly message.
#[derive(Debug, Error)]
pub enum KycError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("this invitation has been revoked")]
    Revoked,

    #[error("this invitation has expired")]
    Expired,

    #[error("this invitation has reached its usage limit")]
    UsageExceeded,

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("step {attempted} is behind the current step {current}")]
    InvalidStep { attempted: u32, current: u32 },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("insufficient privileges")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for KycError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => KycError::NotFound(key),
            StoreError::Duplicate(key) => KycError::Conflict(key),
            StoreError::Revoked => KycError::Revoked,
            StoreError::Expired => KycError::Expired,
            StoreError::UsageExceeded => KycError::UsageExceeded,
            StoreError::InvalidTransition { from, to } => KycError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            StoreError::Backend(msg) => KycError::Storage(msg),
        }
    }
}
