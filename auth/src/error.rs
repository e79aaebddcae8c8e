use thiserror::Error;
use verity_store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or wrong password; deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is disabled")]
    Inactive,

    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("credential hashing failed: {0}")]
    Hash(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => AuthError::NotFound(key),
            StoreError::Duplicate(_) => AuthError::EmailTaken,
            other => AuthError::Storage(other.to_string()),
        }
    }
}
