//! Accounts and credentials: Argon2id password hashing, HMAC-signed
//! bearer tokens, one-time phone codes, and the registration / login /
//! refresh flows.

pub mod challenge;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use challenge::{ChallengeStore, CHALLENGE_TTL_SECS};
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, RegisterRequest, TokenPair};
pub use token::{Claims, TokenKind, TokenSigner, ACCESS_TTL_SECS, REFRESH_TTL_SECS};
