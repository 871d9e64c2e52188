//! HTTP Handlers

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use nerkh_core::{NerkhError, Selector, dispatcher::GUIDANCE};
use nerkh_registry::{ACCESS_DENIED, format_user_list, is_admin};

use crate::state::AppState;

/// Header carrying the caller's telegram id on admin routes
pub const CALLER_HEADER: &str = "x-telegram-id";

/// Shown while a report is being built
pub const LOADING: &str = "لطفا صبر کنید، در حال دریافت اطلاعات...";

const GREETING_PROMPT: &str = "برای دریافت قیمت لحظه‌ای، یکی از گزینه‌های زیر را انتخاب کنید:";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub shape: &'static str,
    pub instruments: usize,
}

#[derive(Debug, Serialize)]
pub struct SelectorsResponse {
    pub keyboard: Vec<Vec<&'static str>>,
    pub loading: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub telegram_id: i64,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub text: String,
    pub keyboard: Vec<Vec<&'static str>>,
    pub newly_registered: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub selector: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn storage_error(e: &nerkh_registry::RegistryError) -> ApiError {
    tracing::error!("Registry error: {}", e);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "User registry unavailable",
        "REGISTRY_ERROR",
    )
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/selectors", get(list_selectors))
        .route("/api/start", post(start))
        .route("/api/report", post(report))
        .route("/api/users", get(list_users))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        shape: state.shape,
        instruments: state.dispatcher.reporter().catalog().len(),
    })
}

/// Keyboard rows of selector labels
pub async fn list_selectors() -> Json<SelectorsResponse> {
    Json(SelectorsResponse {
        keyboard: Selector::keyboard(),
        loading: LOADING,
    })
}

/// Register the caller and greet them with the keyboard
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    let newly_registered = state
        .registry
        .register(payload.telegram_id, &payload.first_name)
        .map_err(|e| storage_error(&e))?;

    Ok(Json(StartResponse {
        text: format!("سلام {}!\n{GREETING_PROMPT}", payload.first_name),
        keyboard: Selector::keyboard(),
        newly_registered,
    }))
}

/// Build the report for a keyboard selection
pub async fn report(
    State(state): State<AppState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("report", %request_id, selector = %payload.selector);

    async move {
        match state.dispatcher.handle(&payload.selector).await {
            Ok(text) => {
                tracing::info!("Report sent");
                Ok(Json(TextResponse { text }))
            }
            Err(NerkhError::UnrecognizedSelector(_)) => {
                tracing::debug!("Unrecognized selector");
                Err(api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    GUIDANCE,
                    "UNRECOGNIZED_SELECTOR",
                ))
            }
            Err(e) => {
                tracing::error!("Report error: {}", e);
                Err(api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Report failed",
                    "REPORT_ERROR",
                ))
            }
        }
    }
    .instrument(span)
    .await
}

/// Admin-only listing of registered users
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TextResponse>, ApiError> {
    let caller = headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok());

    if !is_admin(caller, state.admin_id) {
        tracing::warn!(?caller, "User listing denied");
        return Err(api_error(StatusCode::FORBIDDEN, ACCESS_DENIED, "FORBIDDEN"));
    }

    let users = state.registry.list().map_err(|e| storage_error(&e))?;
    Ok(Json(TextResponse {
        text: format_user_list(&users),
    }))
}
