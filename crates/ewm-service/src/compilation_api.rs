//! # Compilation API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/admin/compilations` | Create a compilation (201) |
//! | PATCH | `/admin/compilations/{compId}` | Update title, pin or events |
//! | DELETE | `/admin/compilations/{compId}` | Delete a compilation (204) |
//! | GET | `/compilations?pinned&from&size` | List compilations |
//! | GET | `/compilations/{compId}` | Get one compilation |

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use ewm_core::{CompilationUpdate, NewCompilation};
use ewm_http::{JsonBody, Params, PathParams};
use ewm_types::datetime;

use crate::api::{ApiError, AppState};
use crate::dto::CompilationResponse;

/// Creates the compilation routes.
pub fn compilation_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/compilations", post(create_compilation))
        .route(
            "/admin/compilations/{comp_id}",
            patch(update_compilation).delete(delete_compilation),
        )
        .route("/compilations", get(list_compilations))
        .route("/compilations/{comp_id}", get(get_compilation))
}

async fn create_compilation(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewCompilation>,
) -> Result<(StatusCode, Json<CompilationResponse>), ApiError> {
    let details = state.store.create_compilation(input)?;
    let views = state
        .views
        .compilation_views(&details.events, datetime::now())
        .await;
    Ok((
        StatusCode::CREATED,
        Json(CompilationResponse::new(details, &views)),
    ))
}

async fn update_compilation(
    State(state): State<AppState>,
    PathParams(comp_id): PathParams<u64>,
    JsonBody(update): JsonBody<CompilationUpdate>,
) -> Result<Json<CompilationResponse>, ApiError> {
    let details = state.store.update_compilation(comp_id, update)?;
    let views = state
        .views
        .compilation_views(&details.events, datetime::now())
        .await;
    Ok(Json(CompilationResponse::new(details, &views)))
}

async fn delete_compilation(
    State(state): State<AppState>,
    PathParams(comp_id): PathParams<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_compilation(comp_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_compilations(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<Json<Vec<CompilationResponse>>, ApiError> {
    let pinned: Option<bool> = params.parse_opt("pinned")?;
    let compilations = state.store.list_compilations(pinned, params.page()?)?;
    let views = state
        .views
        .compilation_views(
            compilations.iter().flat_map(|c| &c.events),
            datetime::now(),
        )
        .await;

    Ok(Json(
        compilations
            .into_iter()
            .map(|c| CompilationResponse::new(c, &views))
            .collect(),
    ))
}

async fn get_compilation(
    State(state): State<AppState>,
    PathParams(comp_id): PathParams<u64>,
) -> Result<Json<CompilationResponse>, ApiError> {
    let details = state.store.get_compilation(comp_id)?;
    let views = state
        .views
        .compilation_views(&details.events, datetime::now())
        .await;
    Ok(Json(CompilationResponse::new(details, &views)))
}
