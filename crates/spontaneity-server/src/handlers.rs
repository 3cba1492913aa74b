//! HTTP request handlers for the recommendation service.
//!
//! Implements session establishment, health, recommendation generation and
//! audit log retrieval using axum.

use crate::config::FeatureFlags;
use crate::pipeline::finalize_recommendation;
use crate::session::{SessionError, SessionManager, SessionResponse};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spontaneity_audit::{create_audit_log_event, AuditError, AuditRecorder, SqliteAuditStore};
use spontaneity_domain::traits::AuditLogStore;
use spontaneity_domain::{AuditLogEvent, AuditQuery, TrustMetadata, TrustPolicy, TrustSignals};
use spontaneity_engine::{EngineError, SpontaneityEngine};
use spontaneity_gatekeeper::GatekeeperError;
use spontaneity_llm::GenerationConfig;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session manager for JWT token operations
    pub session_manager: Arc<SessionManager>,
    /// Adapter fallback engine
    pub engine: Arc<SpontaneityEngine>,
    /// Swallowing audit writer; its store also serves reads
    pub audit: AuditRecorder<SqliteAuditStore>,
    /// Optional pipeline stages
    pub features: FeatureFlags,
}

/// Session establishment request
#[derive(Debug, Deserialize)]
pub struct EstablishSessionRequest {
    /// Optional user ID (defaults to "default-user")
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of configured providers
    pub provider_count: usize,
    /// Provider names in priority order
    pub providers: Vec<String>,
    /// Whether moderation and trust metadata run
    pub trust_layer: bool,
    /// Whether audit events are written
    pub audit_logging: bool,
}

/// Body of `POST /api/generate-recommendation`
#[derive(Debug, Deserialize)]
pub struct GenerateRecommendationRequest {
    /// Free-text request, e.g. "Vibe: chill, Time: 2 hours, Location: Denver"
    #[serde(rename = "userInput", default)]
    pub user_input: String,
    /// Per-request sampling overrides
    #[serde(default)]
    pub config: Option<GenerationConfig>,
    /// Partner policy; the default policy applies when absent
    #[serde(default)]
    pub trust_policy: Option<TrustPolicy>,
    /// Audit collection to write to
    #[serde(default)]
    pub partner_id: Option<String>,
}

/// Response of `POST /api/generate-recommendation`
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRecommendationResponse {
    /// Whether a recommendation was produced
    pub success: bool,
    /// Recommendation encoded as a JSON string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the adapter that produced the result
    #[serde(rename = "adapterUsed", default, skip_serializing_if = "Option::is_none")]
    pub adapter_used: Option<String>,
}

/// Query parameters of `GET /api/audit-logs`
#[derive(Debug, Deserialize)]
pub struct AuditLogsParams {
    /// Partner collection; the default collection when absent
    pub partner_id: Option<String>,
    /// Page size (default 100, max 1000)
    pub limit: Option<usize>,
    /// RFC 3339 cursor; only older events are returned
    pub start_after: Option<String>,
}

/// Pagination block of the audit log response
#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    /// Effective page size
    pub limit: usize,
    /// Number of events in this page
    pub count: usize,
    /// True when the page is full
    pub has_more: bool,
    /// Cursor for the next page
    pub next_start_after: Option<DateTime<Utc>>,
}

/// Response of `GET /api/audit-logs`
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLogsResponse {
    /// Always true
    pub success: bool,
    /// Events, newest first
    pub logs: Vec<AuditLogEvent>,
    /// Paging information
    pub pagination: Pagination,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired bearer token
    Unauthorized(SessionError),
    /// Malformed request
    BadRequest(String),
    /// Engine failure
    Engine(EngineError),
    /// Trust policy could not be satisfied
    Policy(GatekeeperError),
    /// Audit store read failure
    Audit(AuditError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Engine(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Policy(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Audit(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", message);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::JwtEncode(e) => AppError::InternalError(e.to_string()),
            other => AppError::Unauthorized(other),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl From<GatekeeperError> for AppError {
    fn from(e: GatekeeperError) -> Self {
        AppError::Policy(e)
    }
}

impl From<AuditError> for AppError {
    fn from(e: AuditError) -> Self {
        AppError::Audit(e)
    }
}

/// POST /session/establish - Establish a new session
async fn establish_session(
    State(state): State<AppState>,
    Json(request): Json<EstablishSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user_id = request.user_id.unwrap_or_else(|| "default-user".to_string());
    let response = state.session_manager.establish(&user_id)?;
    Ok(Json(response))
}

/// GET /health - Service health and configuration summary
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let provider_count = state.engine.adapter_count();
    let status = if provider_count == 0 { "unhealthy" } else { "healthy" };

    Json(HealthCheckResponse {
        status: status.to_string(),
        provider_count,
        providers: state.engine.adapter_names(),
        trust_layer: state.features.trust_layer,
        audit_logging: state.features.audit_logging,
    })
}

/// POST /api/generate-recommendation - Run the engine and the trust pipeline
async fn generate_recommendation(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRecommendationRequest>, JsonRejection>,
) -> Result<Json<GenerateRecommendationResponse>, AppError> {
    let claims = state.session_manager.authenticate(&headers)?;
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    info!(
        user = %claims.user_id,
        input_len = request.user_input.len(),
        partner = request.partner_id.as_deref().unwrap_or("default"),
        "Generating recommendation"
    );

    let run = state
        .engine
        .run_with_config(&request.user_input, request.config.as_ref())
        .await?;

    let policy = request.trust_policy.unwrap_or_default();
    let finalized = finalize_recommendation(&run.text, &request.user_input, &policy, &state.features)?;

    if state.features.audit_logging {
        let metadata = finalized
            .metadata
            .clone()
            .unwrap_or_else(|| TrustMetadata::from_signals(TrustSignals::ai_only()));
        let event = create_audit_log_event(
            &request.user_input,
            finalized.recommendation_id,
            &metadata,
            &policy,
            &run.adapter_used,
        );
        state
            .audit
            .store_audit_log(&event, request.partner_id.as_deref());
    }

    let result = serde_json::to_string(&finalized.recommendation)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(Json(GenerateRecommendationResponse {
        success: true,
        result: Some(result),
        error: None,
        adapter_used: Some(run.adapter_used),
    }))
}

/// GET /api/audit-logs - Paginated audit events, newest first
async fn list_audit_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<AuditLogsParams>, QueryRejection>,
) -> Result<Json<AuditLogsResponse>, AppError> {
    state.session_manager.authenticate(&headers)?;
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let start_after = params
        .start_after
        .as_deref()
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| AppError::BadRequest(format!("Invalid start_after timestamp: {}", raw)))
        })
        .transpose()?;

    let query = AuditQuery::new(params.partner_id, params.limit, start_after);
    let logs = state.audit.store().list(&query)?;

    let count = logs.len();
    let has_more = count == query.limit;
    let next_start_after = if has_more {
        logs.last().map(|event| event.generated_at)
    } else {
        None
    };

    Ok(Json(AuditLogsResponse {
        success: true,
        logs,
        pagination: Pagination {
            limit: query.limit,
            count,
            has_more,
            next_start_after,
        },
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/session/establish", post(establish_session))
        .route("/health", get(health_check))
        .route("/api/generate-recommendation", post(generate_recommendation))
        .route("/api/audit-logs", get(list_audit_logs))
        .with_state(state)
}
