//! HTTP API of the main service.
//!
//! Feature endpoints live in the `*_api` modules; this module holds the
//! shared state, the error mapping and the router that merges them.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ewm_core::{ErrorKind, EwmError, EwmStore};
use ewm_http::error_response;
use ewm_stats::StatsSource;
use ewm_types::ParamError;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::category_api::category_routes;
use crate::comment_api::comment_routes;
use crate::compilation_api::compilation_routes;
use crate::event_api::event_routes;
use crate::request_api::request_routes;
use crate::user_api::user_routes;
use crate::views::ViewTracker;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Domain store.
    pub store: Arc<EwmStore>,
    /// Hit recording and view counts.
    pub views: ViewTracker,
}

impl AppState {
    pub fn new(store: Arc<EwmStore>, stats: Arc<dyn StatsSource>, app_name: &str) -> Self {
        Self {
            store,
            views: ViewTracker::new(stats, app_name),
        }
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] EwmError),
    #[error(transparent)]
    Param(#[from] ParamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Domain(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            },
            ApiError::Param(_) => StatusCode::BAD_REQUEST,
        };

        tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        error_response(status, self.to_string())
    }
}

/// Address of the caller, as recorded in hits.
///
/// Prefers the first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// peer address when the server was started with connect info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let ip = header("x-forwarded-for")
            .or_else(|| header("x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self(ip))
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(category_routes())
        .merge(user_routes())
        .merge(event_routes())
        .merge(request_routes())
        .merge(compilation_routes())
        .merge(comment_routes())
        .layer(axum::middleware::from_fn(ewm_http::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    app: String,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        app: state.views.app().to_string(),
    })
}
