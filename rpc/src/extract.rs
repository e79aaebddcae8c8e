//! Request extractors.

use crate::error::RpcError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use verity_kyc::KycError;
use verity_types::AuthContext;

/// Extracts the authenticated caller from the `Authorization: Bearer`
/// header. Handlers that take this extractor are tenant-scoped by
/// construction; the context is passed explicitly into every engine
/// call.
pub struct Auth(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = RpcError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(RpcError::Kyc(KycError::Unauthorized))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(RpcError::Kyc(KycError::Unauthorized))?;
        let ctx = state.auth.authenticate(token)?;
        Ok(Auth(ctx))
    }
}
