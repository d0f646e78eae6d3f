//! # Event API
//!
//! ## Initiator endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/users/{userId}/events` | Create an event (201) |
//! | GET | `/users/{userId}/events?from&size` | The user's events |
//! | GET | `/users/{userId}/events/{eventId}` | One of the user's events |
//! | PATCH | `/users/{userId}/events/{eventId}` | Edit or resubmit an event |
//!
//! ## Admin endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/admin/events?users&states&categories&rangeStart&rangeEnd&from&size` | Search all events |
//! | PATCH | `/admin/events/{eventId}` | Edit, publish or reject an event |
//!
//! ## Public endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/events?text&categories&paid&rangeStart&rangeEnd&onlyAvailable&sort&from&size` | Search published events |
//! | GET | `/events/{id}` | One published event |
//!
//! Both public endpoints record a hit with the stats service.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    routing::{get, patch},
    Json, Router,
};
use ewm_core::{
    AdminEventFilter, AdminEventUpdate, EventSort, EventState, NewEvent, PublicEventFilter,
    TimeRange, UserEventUpdate,
};
use ewm_http::{JsonBody, Params, PathParams};
use ewm_types::{datetime, QueryParams};

use crate::api::{ApiError, AppState, ClientIp};
use crate::dto::{EventFullResponse, EventShortResponse};

/// Creates the event routes.
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/events",
            get(list_user_events).post(create_event),
        )
        .route(
            "/users/{user_id}/events/{event_id}",
            get(get_user_event).patch(update_user_event),
        )
        .route("/admin/events", get(search_admin))
        .route("/admin/events/{event_id}", patch(update_admin))
        .route("/events", get(search_public))
        .route("/events/{event_id}", get(get_public))
}

fn range(params: &QueryParams) -> Result<TimeRange, ApiError> {
    Ok(TimeRange::new(
        params.datetime("rangeStart")?,
        params.datetime("rangeEnd")?,
    ))
}

fn admin_filter(params: &QueryParams) -> Result<AdminEventFilter, ApiError> {
    let states = params
        .values("states")
        .into_iter()
        .map(str::parse::<EventState>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AdminEventFilter {
        users: params.parse_list("users")?,
        states,
        categories: params.parse_list("categories")?,
        range: range(params)?,
        page: params.page()?,
    })
}

fn public_filter(params: &QueryParams) -> Result<PublicEventFilter, ApiError> {
    let sort = match params.get("sort") {
        Some(raw) => raw.parse::<EventSort>()?,
        None => EventSort::default(),
    };
    Ok(PublicEventFilter {
        text: params.get("text").map(str::to_string),
        categories: params.parse_list("categories")?,
        paid: params.parse_opt("paid")?,
        range: range(params)?,
        only_available: params.parse_opt("onlyAvailable")?.unwrap_or(false),
        sort,
    })
}

// ==================== Initiator Handlers ====================

async fn create_event(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
    JsonBody(input): JsonBody<NewEvent>,
) -> Result<(StatusCode, Json<EventFullResponse>), ApiError> {
    let details = state.store.create_event(user_id, input, datetime::now())?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

async fn list_user_events(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<u64>,
    Params(params): Params,
) -> Result<Json<Vec<EventShortResponse>>, ApiError> {
    let events = state.store.user_events(user_id, params.page()?)?;
    let views = state.views.search_views(&events, datetime::now()).await;
    Ok(Json(EventShortResponse::with_views(events, &views)))
}

async fn get_user_event(
    State(state): State<AppState>,
    PathParams((user_id, event_id)): PathParams<(u64, u64)>,
) -> Result<Json<EventFullResponse>, ApiError> {
    let details = state.store.user_event(user_id, event_id)?;
    let views = state
        .views
        .event_views(&details.event, datetime::now())
        .await;
    Ok(Json(EventFullResponse::new(details, views)))
}

async fn update_user_event(
    State(state): State<AppState>,
    PathParams((user_id, event_id)): PathParams<(u64, u64)>,
    JsonBody(update): JsonBody<UserEventUpdate>,
) -> Result<Json<EventFullResponse>, ApiError> {
    let details = state
        .store
        .update_event_by_initiator(user_id, event_id, update, datetime::now())?;
    Ok(Json(details.into()))
}

// ==================== Admin Handlers ====================

async fn search_admin(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<Json<Vec<EventFullResponse>>, ApiError> {
    let filter = admin_filter(&params)?;
    let now = datetime::now();
    let events = state.store.search_events_admin(&filter, now)?;
    let views = state.views.search_views(&events, now).await;

    Ok(Json(
        events
            .into_iter()
            .map(|d| {
                let count = views.get(&d.event.id).copied().unwrap_or(0);
                EventFullResponse::new(d, count)
            })
            .collect(),
    ))
}

async fn update_admin(
    State(state): State<AppState>,
    PathParams(event_id): PathParams<u64>,
    JsonBody(update): JsonBody<AdminEventUpdate>,
) -> Result<Json<EventFullResponse>, ApiError> {
    let details = state
        .store
        .update_event_by_admin(event_id, update, datetime::now())?;
    Ok(Json(details.into()))
}

// ==================== Public Handlers ====================

async fn search_public(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    uri: Uri,
    Params(params): Params,
) -> Result<Json<Vec<EventShortResponse>>, ApiError> {
    let now = datetime::now();
    state.views.record_hit(uri.path(), &ip, now).await;

    let filter = public_filter(&params)?;
    let page = params.page()?;
    let mut events = state.store.search_published(&filter, now)?;

    // view ordering needs counts for every match before paging
    let (events, views) = if filter.sort == EventSort::Views {
        let views = state.views.search_views(&events, now).await;
        filter.sort.sort(&mut events, &views);
        (page.apply(events), views)
    } else {
        let events = page.apply(events);
        let views = state.views.search_views(&events, now).await;
        (events, views)
    };

    tracing::debug!(found = events.len(), sort = ?filter.sort, "public event search");
    Ok(Json(EventShortResponse::with_views(events, &views)))
}

async fn get_public(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    uri: Uri,
    PathParams(event_id): PathParams<u64>,
) -> Result<Json<EventFullResponse>, ApiError> {
    let details = state.store.published_event(event_id)?;

    let now = datetime::now();
    state.views.record_hit(uri.path(), &ip, now).await;
    let views = state.views.event_views(&details.event, now).await;

    Ok(Json(EventFullResponse::new(details, views)))
}
