//! Response bodies.
//!
//! Users, categories and participation requests are returned as their
//! `ewm-core` types; events, compilations and comments get flattened views
//! with view counts attached.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use ewm_core::{
    Category, CommentDetails, CompilationDetails, EventDetails, EventState, Location, UserShort,
};
use ewm_types::datetime::{serde_format, serde_format_opt};
use serde::Serialize;

/// Full view of an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFullResponse {
    pub id: u64,
    pub annotation: String,
    pub category: Category,
    pub confirmed_requests: u32,
    #[serde(with = "serde_format")]
    pub created_on: NaiveDateTime,
    pub description: String,
    #[serde(with = "serde_format")]
    pub event_date: NaiveDateTime,
    pub initiator: UserShort,
    pub location: Location,
    pub paid: bool,
    pub participant_limit: u32,
    #[serde(with = "serde_format_opt")]
    pub published_on: Option<NaiveDateTime>,
    pub request_moderation: bool,
    pub state: EventState,
    pub title: String,
    pub views: u64,
    pub comments_count: u32,
}

impl EventFullResponse {
    pub fn new(details: EventDetails, views: u64) -> Self {
        let EventDetails {
            event,
            category,
            initiator,
        } = details;
        Self {
            id: event.id,
            annotation: event.annotation,
            category,
            confirmed_requests: event.confirmed_requests,
            created_on: event.created_on,
            description: event.description,
            event_date: event.event_date,
            initiator,
            location: event.location,
            paid: event.paid,
            participant_limit: event.participant_limit,
            published_on: event.published_on,
            request_moderation: event.request_moderation,
            state: event.state,
            title: event.title,
            views,
            comments_count: event.comments_count,
        }
    }
}

impl From<EventDetails> for EventFullResponse {
    fn from(details: EventDetails) -> Self {
        Self::new(details, 0)
    }
}

/// Listing view of an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventShortResponse {
    pub id: u64,
    pub annotation: String,
    pub category: Category,
    pub confirmed_requests: u32,
    #[serde(with = "serde_format")]
    pub event_date: NaiveDateTime,
    pub initiator: UserShort,
    pub paid: bool,
    pub request_moderation: bool,
    pub title: String,
    pub views: u64,
    pub comments_count: u32,
}

impl EventShortResponse {
    pub fn new(details: EventDetails, views: u64) -> Self {
        let EventDetails {
            event,
            category,
            initiator,
        } = details;
        Self {
            id: event.id,
            annotation: event.annotation,
            category,
            confirmed_requests: event.confirmed_requests,
            event_date: event.event_date,
            initiator,
            paid: event.paid,
            request_moderation: event.request_moderation,
            title: event.title,
            views,
            comments_count: event.comments_count,
        }
    }

    /// Builds one response per event, taking views from `views`.
    pub fn with_views(events: Vec<EventDetails>, views: &HashMap<u64, u64>) -> Vec<Self> {
        events
            .into_iter()
            .map(|d| {
                let count = views.get(&d.event.id).copied().unwrap_or(0);
                Self::new(d, count)
            })
            .collect()
    }
}

impl From<EventDetails> for EventShortResponse {
    fn from(details: EventDetails) -> Self {
        Self::new(details, 0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationResponse {
    pub id: u64,
    pub events: Vec<EventShortResponse>,
    pub pinned: bool,
    pub title: String,
}

impl CompilationResponse {
    pub fn new(details: CompilationDetails, views: &HashMap<u64, u64>) -> Self {
        Self {
            id: details.compilation.id,
            events: EventShortResponse::with_views(details.events, views),
            pinned: details.compilation.pinned,
            title: details.compilation.title,
        }
    }
}

/// A comment as its author sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: u64,
    pub text: String,
    pub author_name: String,
    #[serde(with = "serde_format")]
    pub created: NaiveDateTime,
}

impl From<CommentDetails> for CommentResponse {
    fn from(details: CommentDetails) -> Self {
        Self {
            id: details.comment.id,
            text: details.comment.text,
            author_name: details.author.name,
            created: details.comment.created,
        }
    }
}

/// A comment with its author and event, for moderation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFullResponse {
    pub id: u64,
    pub text: String,
    pub author: UserShort,
    pub event: EventShortResponse,
    #[serde(with = "serde_format")]
    pub created: NaiveDateTime,
}

impl From<CommentDetails> for CommentFullResponse {
    fn from(details: CommentDetails) -> Self {
        Self {
            id: details.comment.id,
            text: details.comment.text,
            author: details.author,
            event: details.event.into(),
            created: details.comment.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ewm_core::{Event, NewEvent};
    use ewm_types::datetime;

    fn details() -> EventDetails {
        let input = NewEvent {
            annotation: "Annotation of twenty chars".into(),
            category: 1,
            description: "Description of twenty chars".into(),
            event_date: datetime::parse("2030-01-01 10:00:00").unwrap(),
            location: Location { lat: 1.0, lon: 2.0 },
            paid: true,
            participant_limit: 5,
            request_moderation: true,
            title: "Title".into(),
        };
        EventDetails {
            event: Event::new(3, 2, input, datetime::parse("2029-12-01 10:00:00").unwrap()),
            category: Category {
                id: 1,
                name: "Music".into(),
            },
            initiator: UserShort {
                id: 2,
                name: "Ann".into(),
            },
        }
    }

    #[test]
    fn test_full_event_wire_format() {
        let json = serde_json::to_value(EventFullResponse::new(details(), 7)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["category"]["name"], "Music");
        assert_eq!(json["initiator"]["name"], "Ann");
        assert_eq!(json["eventDate"], "2030-01-01 10:00:00");
        assert_eq!(json["createdOn"], "2029-12-01 10:00:00");
        assert!(json["publishedOn"].is_null());
        assert_eq!(json["state"], "PENDING");
        assert_eq!(json["participantLimit"], 5);
        assert_eq!(json["views"], 7);
        assert_eq!(json["commentsCount"], 0);
    }

    #[test]
    fn test_short_event_takes_views_from_map() {
        let views = HashMap::from([(3, 11)]);
        let list = EventShortResponse::with_views(vec![details()], &views);
        let json = serde_json::to_value(&list[0]).unwrap();
        assert_eq!(json["views"], 11);
        assert_eq!(json["confirmedRequests"], 0);
        assert!(json.get("description").is_none());
    }
}
