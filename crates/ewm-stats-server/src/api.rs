//! HTTP API of the stats server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use ewm_http::{error_response, JsonBody, Params};
use ewm_stats::{HitStore, NewHit, StatsError, StatsQuery, ViewStats};
use ewm_types::ParamError;
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub hits: Arc<HitStore>,
}

impl AppState {
    pub fn new(hits: Arc<HitStore>) -> Self {
        Self { hits }
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Param(#[from] ParamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Stats(StatsError::InvalidRange { .. })
            | ApiError::Stats(StatsError::BlankField { .. })
            | ApiError::Param(_) => StatusCode::BAD_REQUEST,
            ApiError::Stats(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "stats request failed");
        } else {
            tracing::debug!(error = %self, "rejected stats request");
        }
        error_response(status, self.to_string())
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/hit", post(save_hit))
        .route("/stats", get(get_stats))
        .route("/test/reset-hits", delete(reset_hits))
        .layer(axum::middleware::from_fn(ewm_http::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    hits: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        hits: state.hits.len(),
    })
}

async fn save_hit(
    State(state): State<AppState>,
    JsonBody(hit): JsonBody<NewHit>,
) -> Result<StatusCode, ApiError> {
    let stored = state.hits.record(hit)?;
    tracing::debug!(id = stored.id, app = %stored.app, uri = %stored.uri, "hit recorded");
    Ok(StatusCode::CREATED)
}

async fn get_stats(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<Json<Vec<ViewStats>>, ApiError> {
    let query = StatsQuery::new(
        params.require_datetime("start")?,
        params.require_datetime("end")?,
    )
    .uris(params.values("uris"))
    .unique(params.parse_opt("unique")?.unwrap_or(false));

    let stats = state.hits.stats(&query)?;
    tracing::debug!(
        start = %query.start,
        end = %query.end,
        uris = query.uris.len(),
        unique = query.unique,
        groups = stats.len(),
        "stats served"
    );
    Ok(Json(stats))
}

async fn reset_hits(State(state): State<AppState>) -> StatusCode {
    let dropped = state.hits.len();
    state.hits.clear();
    tracing::info!(dropped, "hits reset");
    StatusCode::OK
}
