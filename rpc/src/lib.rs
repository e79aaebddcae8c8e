//! REST API server for the Verity KYC platform.
//!
//! Surfaces, under `/api/v1`:
//! - account registration, login, and token refresh
//! - one-time phone codes
//! - invitation issuance, listing, revocation, and public validation
//! - customer verification sessions and step writes
//! - one-shot submissions and the reviewer queue
//! - the tenant audit trail and tenant deletion

pub mod error;
pub mod extract;
pub mod handlers;
pub mod pagination;
pub mod server;
pub mod state;

pub use error::RpcError;
pub use server::RpcServer;
pub use state::AppState;
