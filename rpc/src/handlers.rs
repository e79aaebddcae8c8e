//! REST request handlers.

use crate::error::RpcError;
use crate::extract::Auth;
use crate::pagination::{Page, PageParams};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use verity_auth::{RegisterRequest, TokenPair};
use verity_kyc::{CustomerContact, IssueInvitation, KycError, StepPayload, SubmissionMeta};
use verity_types::{
    AuditLog, BiometricData, DocumentData, GeolocationData, IdentityInfo, Invitation,
    InvitationId, Organization, PhoneVerification, Session, SessionId, Submission, SubmissionId,
    SubmissionStatus, User, VerificationStep,
};

/// Deserialize a JSON payload with a uniform 400 on failure, so every
/// malformed body reports the same way regardless of which field broke.
fn parse_payload<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, RpcError> {
    serde_json::from_value(value).map_err(|err| RpcError::BadRequest(err.to_string()))
}

fn source_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

// ── Auth ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RegisterResponse {
    pub organization: Organization,
    pub user: User,
    pub tokens: TokenPair,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), RpcError> {
    let (organization, user, tokens) = state.auth.register(req)?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            organization,
            user,
            tokens,
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub tokens: TokenPair,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, RpcError> {
    let (user, tokens) = state.auth.login(&req.email, &req.password)?;
    Ok(Json(LoginResponse { user, tokens }))
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, RpcError> {
    Ok(Json(state.auth.refresh(&req.refresh_token)?))
}

// ── One-time phone codes ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OtpSendRequest {
    pub phone: String,
}

pub async fn otp_send(
    State(state): State<AppState>,
    Json(req): Json<OtpSendRequest>,
) -> Result<Json<serde_json::Value>, RpcError> {
    let code = state.challenges.issue(&req.phone);
    // The code goes out through the SMS gateway, not the response.
    tracing::debug!(phone = %req.phone, %code, "one-time code issued");
    Ok(Json(serde_json::json!({ "sent": true })))
}

#[derive(Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub code: String,
}

pub async fn otp_verify(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Json<serde_json::Value>, RpcError> {
    let verified = state.challenges.verify(&req.phone, &req.code);
    Ok(Json(serde_json::json!({ "verified": verified })))
}

// ── Invitations ──────────────────────────────────────────────────────────

pub async fn create_invitation(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(req): Json<IssueInvitation>,
) -> Result<(StatusCode, Json<Invitation>), RpcError> {
    let invitation = state.registry.issue(&ctx, req)?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

pub async fn list_invitations(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Invitation>>, RpcError> {
    let (total, items) = state
        .registry
        .list(&ctx, params.skip(), params.limit())?;
    Ok(Json(Page::new(total, &params, items)))
}

pub async fn get_invitation(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> Result<Json<Invitation>, RpcError> {
    Ok(Json(state.registry.get(&ctx, &InvitationId::new(id))?))
}

pub async fn revoke_invitation(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> Result<Json<Invitation>, RpcError> {
    Ok(Json(state.registry.revoke(&ctx, &InvitationId::new(id))?))
}

/// Public code validation. Never errors for lifecycle reasons: an
/// unusable code is a `valid: false` answer, not a failure.
#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<Invitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

pub async fn validate_invitation(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ValidateResponse>, RpcError> {
    let response = match state.registry.validate(&code) {
        Ok(invitation) => ValidateResponse {
            valid: true,
            invitation: Some(invitation),
            reason: None,
        },
        Err(err) => {
            let reason = match err {
                KycError::NotFound(_) => "not_found",
                KycError::Revoked => "revoked",
                KycError::Expired => "expired",
                KycError::UsageExceeded => "usage_exceeded",
                other => return Err(other.into()),
            };
            ValidateResponse {
                valid: false,
                invitation: None,
                reason: Some(reason),
            }
        }
    };
    Ok(Json(response))
}

// ── Verification sessions ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OpenSessionRequest {
    pub code: String,
}

pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<Session>), RpcError> {
    let session = state.tracker.open(&req.code)?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, RpcError> {
    Ok(Json(state.tracker.get(&SessionId::new(id))?))
}

/// The step name comes from the path and selects the payload type the
/// body must deserialize into.
pub async fn write_step(
    State(state): State<AppState>,
    Path((id, step)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Session>, RpcError> {
    let step: VerificationStep = step
        .parse()
        .map_err(|err: verity_types::UnknownStep| RpcError::BadRequest(err.to_string()))?;
    let payload = match step {
        VerificationStep::IdentityInfo => StepPayload::IdentityInfo(parse_payload(body)?),
        VerificationStep::PhoneVerification => {
            StepPayload::PhoneVerification(parse_payload(body)?)
        }
        VerificationStep::Document => StepPayload::Document(parse_payload(body)?),
        VerificationStep::Biometric => StepPayload::Biometric(parse_payload(body)?),
        VerificationStep::Geolocation => StepPayload::Geolocation(parse_payload(body)?),
    };
    Ok(Json(state.tracker.write_step(&SessionId::new(id), payload)?))
}

#[derive(Default, Deserialize)]
pub struct SubmitSessionRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SubmitSessionRequest>,
) -> Result<(StatusCode, Json<Submission>), RpcError> {
    let session = state.tracker.finalize(&SessionId::new(id))?;
    let contact = CustomerContact {
        name: None,
        email: req.email,
        phone: None,
    };
    let meta = SubmissionMeta {
        source_ip: source_ip(&headers),
        source_location: None,
        metadata: req.metadata,
    };
    let submission = state.workflow.create(&session, contact, meta)?;
    Ok((StatusCode::CREATED, Json(submission)))
}

// ── One-shot submissions ─────────────────────────────────────────────────

/// The single-request flow: invitation code plus every payload at
/// once, for integrations that collect the data themselves.
#[derive(Deserialize)]
pub struct OneShotRequest {
    pub code: String,
    pub user_info: serde_json::Value,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub phone_verified: Option<bool>,
    #[serde(default)]
    pub document: Option<serde_json::Value>,
    #[serde(default)]
    pub biometric: Option<serde_json::Value>,
    #[serde(default)]
    pub geolocation: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

pub async fn create_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OneShotRequest>,
) -> Result<(StatusCode, Json<Submission>), RpcError> {
    // Parse every payload before touching any state, so a malformed
    // field cannot leave a half-written session behind.
    let identity: IdentityInfo = parse_payload(req.user_info)?;
    let document: Option<DocumentData> = req.document.map(parse_payload).transpose()?;
    let biometric: Option<BiometricData> = req.biometric.map(parse_payload).transpose()?;
    let geolocation: Option<GeolocationData> = req.geolocation.map(parse_payload).transpose()?;

    let session = state.tracker.open(&req.code)?;
    let mut session = state
        .tracker
        .write_step(&session.id, StepPayload::IdentityInfo(identity))?;
    if let Some(phone) = req.phone.clone() {
        session = state.tracker.write_step(
            &session.id,
            StepPayload::PhoneVerification(PhoneVerification {
                phone,
                verified: req.phone_verified.unwrap_or(false),
                verified_at: None,
            }),
        )?;
    }
    if let Some(document) = document {
        session = state
            .tracker
            .write_step(&session.id, StepPayload::Document(document))?;
    }
    if let Some(biometric) = biometric {
        session = state
            .tracker
            .write_step(&session.id, StepPayload::Biometric(biometric))?;
    }
    if let Some(geolocation) = geolocation {
        session = state
            .tracker
            .write_step(&session.id, StepPayload::Geolocation(geolocation))?;
    }

    let contact = CustomerContact {
        name: None,
        email: req.email,
        phone: req.phone,
    };
    let meta = SubmissionMeta {
        source_ip: source_ip(&headers),
        source_location: None,
        metadata: req.metadata,
    };
    let submission = state.workflow.create(&session, contact, meta)?;
    Ok((StatusCode::CREATED, Json(submission)))
}

// ── Submission review ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmissionFilter {
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Query(filter): Query<SubmissionFilter>,
) -> Result<Json<Page<Submission>>, RpcError> {
    let page = PageParams {
        skip: filter.skip,
        limit: filter.limit,
    };
    let (total, items) = state
        .workflow
        .list(&ctx, filter.status, page.skip(), page.limit())?;
    Ok(Json(Page::new(total, &page, items)))
}

pub async fn get_submission(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> Result<Json<Submission>, RpcError> {
    Ok(Json(state.workflow.get(&ctx, &SubmissionId::new(id))?))
}

#[derive(Default, Deserialize)]
pub struct ReviewNotes {
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn approve_submission(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
    Json(req): Json<ReviewNotes>,
) -> Result<Json<Submission>, RpcError> {
    Ok(Json(state.workflow.approve(
        &ctx,
        &SubmissionId::new(id),
        req.notes,
    )?))
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn reject_submission(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<Submission>, RpcError> {
    Ok(Json(state.workflow.reject(
        &ctx,
        &SubmissionId::new(id),
        &req.reason,
        req.notes,
    )?))
}

pub async fn escalate_submission(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
    Json(req): Json<ReviewNotes>,
) -> Result<Json<Submission>, RpcError> {
    Ok(Json(state.workflow.escalate(
        &ctx,
        &SubmissionId::new(id),
        req.notes,
    )?))
}

pub async fn archive_submission(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> Result<Json<Submission>, RpcError> {
    Ok(Json(state.workflow.archive(&ctx, &SubmissionId::new(id))?))
}

// ── Audit trail ──────────────────────────────────────────────────────────

pub async fn list_audit(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<AuditLog>>, RpcError> {
    let (total, items) = state
        .recorder
        .list(&ctx, params.skip(), params.limit())?;
    Ok(Json(Page::new(total, &params, items)))
}

// ── Organization ─────────────────────────────────────────────────────────

/// Delete the caller's tenant and everything under it. Admin-only and
/// deliberately explicit; there is no implicit cascade anywhere else.
pub async fn delete_organization(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> Result<StatusCode, RpcError> {
    if !ctx.is_admin() {
        return Err(KycError::Forbidden.into());
    }
    state
        .store
        .delete_organization(&ctx.org_id)
        .map_err(KycError::from)?;
    tracing::info!(org = %ctx.org_id, "organization deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ── Health ───────────────────────────────────────────────────────────────

pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
