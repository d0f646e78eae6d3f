//! # Comment API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/users/{userId}/comments/events/{eventId}` | Comment on a published event (201) |
//! | PATCH | `/users/{userId}/comments/{commentId}` | Edit an own comment |
//! | DELETE | `/users/{userId}/comments/{commentId}` | Delete an own comment (204) |
//! | GET | `/users/{userId}/comments?eventIds&rangeStart&rangeEnd&from&size` | Own comments |
//! | GET | `/admin/comments?eventIds&authorIds&rangeStart&rangeEnd&from&size` | Moderation search |
//! | DELETE | `/admin/comments/{commentId}` | Delete any comment (204) |

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use ewm_core::{CommentFilter, CommentText, TimeRange};
use ewm_http::{JsonBody, Params, PathParams};
use ewm_types::{datetime, QueryParams};

use crate::api::{ApiError, AppState};
use crate::dto::{CommentFullResponse, CommentResponse};

/// Creates the comment routes.
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/comments/events/{event_id}",
            post(add_comment),
        )
        .route(
            "/users/{user_id}/comments/{comment_id}",
            patch(update_comment).delete(delete_comment),
        )
        .route("/users/{user_id}/comments", get(own_comments))
        .route("/admin/comments", get(search_comments))
        .route("/admin/comments/{comment_id}", delete(delete_by_admin))
}

fn comment_filter(params: &QueryParams) -> Result<CommentFilter, ApiError> {
    Ok(CommentFilter {
        event_ids: params.parse_list("eventIds")?,
        author_ids: params.parse_list("authorIds")?,
        range: TimeRange::new(params.datetime("rangeStart")?, params.datetime("rangeEnd")?),
        page: params.page()?,
    })
}

async fn add_comment(
    State(state): State<AppState>,
    PathParams((user_id, event_id)): PathParams<(u64, u64)>,
    JsonBody(input): JsonBody<CommentText>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let details = state
        .store
        .add_comment(user_id, event_id, input, datetime::now())?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

async fn update_comment(
    State(state): State<AppState>,
    PathParams((user_id, comment_id)): PathParams<(u64, u64)>,
    JsonBody(input): JsonBody<CommentText>,
) -> Result<Json<CommentResponse>, ApiError> {
    let details = state.store.update_comment(user_id, comment_id, input)?;
    Ok(Json(details.into()))
}

async fn delete_comment(
    State(state): State<AppState>,
    PathParams((user_id, comment_id)): PathParams<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_comment(user_id, comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn own_comments(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
    Params(params): Params,
) -> Result<Json<Vec<CommentFullResponse>>, ApiError> {
    let filter = comment_filter(&params)?;
    let comments = state.store.own_comments(user_id, &filter)?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

async fn search_comments(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<Json<Vec<CommentFullResponse>>, ApiError> {
    let filter = comment_filter(&params)?;
    let comments = state.store.search_comments(&filter)?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

async fn delete_by_admin(
    State(state): State<AppState>,
    PathParams(comment_id): PathParams<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_comment_by_admin(comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}
