//! RPC error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use verity_auth::AuthError;
use verity_kyc::KycError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Kyc(#[from] KycError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    fn status(&self) -> StatusCode {
        match self {
            RpcError::Kyc(err) => match err {
                KycError::NotFound(_) => StatusCode::NOT_FOUND,
                KycError::Revoked | KycError::Expired | KycError::UsageExceeded => {
                    StatusCode::GONE
                }
                KycError::InvalidTransition { .. } | KycError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                KycError::InvalidStep { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                KycError::BadRequest(_) => StatusCode::BAD_REQUEST,
                KycError::Unauthorized => StatusCode::UNAUTHORIZED,
                KycError::Forbidden => StatusCode::FORBIDDEN,
                KycError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RpcError::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
                AuthError::Inactive => StatusCode::FORBIDDEN,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::Invalid(_) => StatusCode::BAD_REQUEST,
                AuthError::NotFound(_) => StatusCode::NOT_FOUND,
                AuthError::Hash(_) | AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RpcError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details stay in the log, not on the wire.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(%self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_map_to_gone() {
        for err in [KycError::Revoked, KycError::Expired, KycError::UsageExceeded] {
            assert_eq!(RpcError::from(err).status(), StatusCode::GONE);
        }
    }

    #[test]
    fn tenant_misses_map_to_not_found() {
        let err = RpcError::from(KycError::NotFound("inv_x".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn review_conflicts_map_to_conflict() {
        let err = RpcError::from(KycError::InvalidTransition {
            from: "approved".into(),
            to: "rejected".into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn credential_errors_map_to_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
        ] {
            assert_eq!(RpcError::from(err).status(), StatusCode::UNAUTHORIZED);
        }
    }
}
