//! Axum server wiring.

use crate::error::RpcError;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

pub struct RpcServer {
    addr: SocketAddr,
    state: AppState,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// The full route table under `/api/v1`.
    pub fn router(state: AppState) -> Router {
        let api = Router::new()
            // Accounts and tokens.
            .route("/auth/register", post(handlers::register))
            .route("/auth/login", post(handlers::login))
            .route("/auth/refresh", post(handlers::refresh))
            // One-time phone codes.
            .route("/otp/send", post(handlers::otp_send))
            .route("/otp/verify", post(handlers::otp_verify))
            // Invitations (tenant-scoped except validate).
            .route(
                "/invitations",
                post(handlers::create_invitation).get(handlers::list_invitations),
            )
            .route("/invitations/:id", get(handlers::get_invitation))
            .route("/invitations/:id/revoke", post(handlers::revoke_invitation))
            .route(
                "/invitations/:code/validate",
                get(handlers::validate_invitation),
            )
            // Customer verification sessions (capability: session id).
            .route("/kyc/sessions", post(handlers::open_session))
            .route("/kyc/sessions/:id", get(handlers::get_session))
            .route("/kyc/sessions/:id/steps/:step", put(handlers::write_step))
            .route("/kyc/sessions/:id/submit", post(handlers::submit_session))
            // One-shot submission for integrations.
            .route("/kyc/submissions", post(handlers::create_submission))
            // Review queue.
            .route("/submissions", get(handlers::list_submissions))
            .route("/submissions/:id", get(handlers::get_submission))
            .route(
                "/submissions/:id/approve",
                post(handlers::approve_submission),
            )
            .route("/submissions/:id/reject", post(handlers::reject_submission))
            .route(
                "/submissions/:id/escalate",
                post(handlers::escalate_submission),
            )
            .route(
                "/submissions/:id/archive",
                post(handlers::archive_submission),
            )
            // Audit trail.
            .route("/audit", get(handlers::list_audit))
            // Tenant removal.
            .route("/organization", delete(handlers::delete_organization));

        Router::new()
            .nest("/api/v1", api)
            .route("/healthz", get(handlers::healthz))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn serve(self) -> Result<(), RpcError> {
        let router = Self::router(self.state);
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|err| RpcError::Server(err.to_string()))?;
        tracing::info!(addr = %self.addr, "rpc server listening");
        axum::serve(listener, router)
            .await
            .map_err(|err| RpcError::Server(err.to_string()))
    }
}
