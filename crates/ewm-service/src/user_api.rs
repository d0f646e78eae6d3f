//! # User administration API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/admin/users` | Register a user (201) |
//! | GET | `/admin/users?ids&from&size` | List users, optionally by id |
//! | GET | `/admin/users/{userId}` | Get one user |
//! | DELETE | `/admin/users/{userId}` | Delete a user (204) |

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ewm_core::{NewUser, User};
use ewm_http::{JsonBody, Params, PathParams};

use crate::api::{ApiError, AppState};

/// Creates the user administration routes.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/{user_id}", get(get_user).delete(delete_user))
}

async fn create_user(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.store.create_user(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<Json<Vec<User>>, ApiError> {
    let ids: Vec<u64> = params.parse_list("ids")?;
    Ok(Json(state.store.list_users(&ids, params.page()?)))
}

async fn get_user(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.store.get_user(user_id)?))
}

async fn delete_user(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_user(user_id)?;
    Ok(StatusCode::NO_CONTENT)
}
