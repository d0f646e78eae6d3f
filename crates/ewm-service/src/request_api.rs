//! # Participation request API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/users/{userId}/requests?eventId` | Ask to join an event (201) |
//! | GET | `/users/{userId}/requests` | The user's own requests |
//! | PATCH | `/users/{userId}/requests/{requestId}/cancel` | Withdraw a request |
//! | GET | `/users/{userId}/events/{eventId}/requests` | Requests to the initiator's event |
//! | PATCH | `/users/{userId}/events/{eventId}/requests` | Confirm or reject a batch |
//!
//! ## Request lifecycle
//!
//! ```text
//! PENDING ──┬──> CONFIRMED ──> CANCELED
//!           ├──> REJECTED
//!           └──> CANCELED
//! ```

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use ewm_core::{ParticipationRequest, StatusUpdate, StatusUpdateResult};
use ewm_http::{JsonBody, Params, PathParams};
use ewm_types::datetime;

use crate::api::{ApiError, AppState};

/// Creates the participation request routes.
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/requests",
            get(list_own_requests).post(create_request),
        )
        .route(
            "/users/{user_id}/requests/{request_id}/cancel",
            patch(cancel_request),
        )
        .route(
            "/users/{user_id}/events/{event_id}/requests",
            get(list_event_requests).patch(update_statuses),
        )
}

async fn create_request(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
    Params(params): Params,
) -> Result<(StatusCode, Json<ParticipationRequest>), ApiError> {
    let event_id: u64 = params.require("eventId")?;
    let request = state
        .store
        .create_request(user_id, event_id, datetime::now())?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn list_own_requests(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
) -> Result<Json<Vec<ParticipationRequest>>, ApiError> {
    Ok(Json(state.store.own_requests(user_id)?))
}

async fn cancel_request(
    State(state): State<AppState>,
    PathParams((user_id, request_id)): PathParams<(u64, u64)>,
) -> Result<Json<ParticipationRequest>, ApiError> {
    Ok(Json(state.store.cancel_request(user_id, request_id)?))
}

async fn list_event_requests(
    State(state): State<AppState>,
    PathParams((user_id, event_id)): PathParams<(u64, u64)>,
) -> Result<Json<Vec<ParticipationRequest>>, ApiError> {
    Ok(Json(state.store.event_requests(user_id, event_id)?))
}

async fn update_statuses(
    State(state): State<AppState>,
    PathParams((user_id, event_id)): PathParams<(u64, u64)>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<StatusUpdateResult>, ApiError> {
    Ok(Json(
        state
            .store
            .update_request_statuses(user_id, event_id, update)?,
    ))
}
