//! # Category API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/admin/categories` | Create a category (201) |
//! | PATCH | `/admin/categories/{catId}` | Rename a category |
//! | DELETE | `/admin/categories/{catId}` | Delete an unused category (204) |
//! | GET | `/categories?from&size` | List categories |
//! | GET | `/categories/{catId}` | Get one category |

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use ewm_core::{Category, NewCategory};
use ewm_http::{JsonBody, Params, PathParams};

use crate::api::{ApiError, AppState};

/// Creates the category routes.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/categories", post(create_category))
        .route(
            "/admin/categories/{cat_id}",
            patch(update_category).delete(delete_category),
        )
        .route("/categories", get(list_categories))
        .route("/categories/{cat_id}", get(get_category))
}

async fn create_category(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.store.create_category(input)?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    PathParams(cat_id): PathParams<u64>,
    JsonBody(input): JsonBody<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.store.update_category(cat_id, input)?))
}

async fn delete_category(
    State(state): State<AppState>,
    PathParams(cat_id): PathParams<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_category(cat_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_categories(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.list_categories(params.page()?)))
}

async fn get_category(
    State(state): State<AppState>,
    PathParams(cat_id): PathParams<u64>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.store.get_category(cat_id)?))
}
