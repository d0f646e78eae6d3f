//! Events and their moderation lifecycle.

use std::str::FromStr;

use chrono::NaiveDateTime;
use ewm_types::datetime::{serde_format, serde_format_opt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;
use crate::{Category, EwmError, Result, UserShort};

/// Moderation state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    /// Waiting for an administrator.
    Pending,
    /// Visible to everyone and open for requests.
    Published,
    /// Withdrawn by its initiator or rejected by an administrator.
    Canceled,
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventState::Pending => write!(f, "PENDING"),
            EventState::Published => write!(f, "PUBLISHED"),
            EventState::Canceled => write!(f, "CANCELED"),
        }
    }
}

impl FromStr for EventState {
    type Err = EwmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(EventState::Pending),
            "PUBLISHED" => Ok(EventState::Published),
            "CANCELED" => Ok(EventState::Canceled),
            other => Err(EwmError::Validation(format!("Unknown event state: {other}"))),
        }
    }
}

/// State change an initiator may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStateAction {
    SendToReview,
    CancelReview,
}

/// State change an administrator may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminStateAction {
    PublishEvent,
    RejectEvent,
}

/// Where an event takes place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// An event users can ask to join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub annotation: String,
    pub description: String,
    pub title: String,
    pub category_id: u64,
    pub initiator_id: u64,
    pub location: Location,
    pub paid: bool,
    #[serde(with = "serde_format")]
    pub event_date: NaiveDateTime,
    #[serde(with = "serde_format")]
    pub created_on: NaiveDateTime,
    #[serde(with = "serde_format_opt")]
    pub published_on: Option<NaiveDateTime>,
    /// Maximum confirmed participants; 0 means unlimited.
    pub participant_limit: u32,
    /// Whether requests wait for the initiator's decision.
    pub request_moderation: bool,
    pub state: EventState,
    /// Number of CONFIRMED requests.
    pub confirmed_requests: u32,
    pub comments_count: u32,
}

impl Event {
    /// Creates a PENDING event from validated input.
    pub fn new(id: u64, initiator_id: u64, input: NewEvent, now: NaiveDateTime) -> Self {
        Self {
            id,
            annotation: input.annotation,
            description: input.description,
            title: input.title,
            category_id: input.category,
            initiator_id,
            location: input.location,
            paid: input.paid,
            event_date: input.event_date,
            created_on: now,
            published_on: None,
            participant_limit: input.participant_limit,
            request_moderation: input.request_moderation,
            state: EventState::Pending,
            confirmed_requests: 0,
            comments_count: 0,
        }
    }

    /// Returns true if the event is published.
    pub fn is_published(&self) -> bool {
        self.state == EventState::Published
    }

    /// Returns true if no further participant can be confirmed.
    pub fn is_full(&self) -> bool {
        self.participant_limit != 0 && self.confirmed_requests >= self.participant_limit
    }

    /// Places left, or `None` when the event is unlimited.
    pub fn free_places(&self) -> Option<u32> {
        (self.participant_limit != 0)
            .then(|| self.participant_limit.saturating_sub(self.confirmed_requests))
    }

    /// Confirms `n` more participants if they all fit.
    ///
    /// Never lets `confirmed_requests` pass a non-zero limit; returns false
    /// and leaves the counter alone otherwise.
    pub fn try_admit(&mut self, n: u32) -> bool {
        let Some(next) = self.confirmed_requests.checked_add(n) else {
            return false;
        };
        if self.participant_limit != 0 && next > self.participant_limit {
            return false;
        }
        self.confirmed_requests = next;
        true
    }

    /// Gives one confirmed place back.
    pub fn release(&mut self) {
        self.confirmed_requests = self.confirmed_requests.saturating_sub(1);
    }

    fn transition_error(&self, action: &'static str) -> EwmError {
        EwmError::InvalidEventTransition {
            event_id: self.id,
            action,
            state: self.state,
        }
    }

    /// PENDING -> PUBLISHED.
    pub fn publish(&mut self, now: NaiveDateTime) -> Result<()> {
        if self.state != EventState::Pending {
            return Err(self.transition_error("publish"));
        }
        self.state = EventState::Published;
        self.published_on = Some(now);
        Ok(())
    }

    /// PENDING -> CANCELED, by an administrator.
    pub fn reject(&mut self) -> Result<()> {
        if self.state != EventState::Pending {
            return Err(self.transition_error("reject"));
        }
        self.state = EventState::Canceled;
        Ok(())
    }

    /// PENDING | CANCELED -> PENDING.
    pub fn send_to_review(&mut self) -> Result<()> {
        if self.state == EventState::Published {
            return Err(self.transition_error("send to review"));
        }
        self.state = EventState::Pending;
        Ok(())
    }

    /// PENDING | CANCELED -> CANCELED.
    pub fn cancel_review(&mut self) -> Result<()> {
        if self.state == EventState::Published {
            return Err(self.transition_error("cancel"));
        }
        self.state = EventState::Canceled;
        Ok(())
    }

    /// Applies every field present in `changes`.
    pub fn apply(&mut self, changes: EventChanges) {
        if let Some(annotation) = changes.annotation {
            self.annotation = annotation;
        }
        if let Some(category) = changes.category {
            self.category_id = category;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(event_date) = changes.event_date {
            self.event_date = event_date;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(paid) = changes.paid {
            self.paid = paid;
        }
        if let Some(limit) = changes.participant_limit {
            self.participant_limit = limit;
        }
        if let Some(moderation) = changes.request_moderation {
            self.request_moderation = moderation;
        }
        if let Some(title) = changes.title {
            self.title = title;
        }
    }
}

/// An event together with the entities it references.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub event: Event,
    pub category: Category,
    pub initiator: UserShort,
}

fn default_true() -> bool {
    true
}

/// Input for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = 20, max = 2000), custom(function = "not_blank"))]
    pub annotation: String,
    /// Category id.
    pub category: u64,
    #[validate(length(min = 20, max = 7000), custom(function = "not_blank"))]
    pub description: String,
    #[serde(with = "serde_format")]
    pub event_date: NaiveDateTime,
    pub location: Location,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub participant_limit: u32,
    #[serde(default = "default_true")]
    pub request_moderation: bool,
    #[validate(length(min = 3, max = 120), custom(function = "not_blank"))]
    pub title: String,
}

/// Field changes common to initiator and administrator updates.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    #[validate(length(min = 20, max = 2000))]
    pub annotation: Option<String>,
    pub category: Option<u64>,
    #[validate(length(min = 20, max = 7000))]
    pub description: Option<String>,
    #[serde(default, with = "serde_format_opt")]
    pub event_date: Option<NaiveDateTime>,
    pub location: Option<Location>,
    pub paid: Option<bool>,
    pub participant_limit: Option<u32>,
    pub request_moderation: Option<bool>,
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,
}

/// Update sent by an event's initiator.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserEventUpdate {
    #[serde(flatten)]
    #[validate(nested)]
    pub changes: EventChanges,
    pub state_action: Option<UserStateAction>,
}

/// Update sent by an administrator.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventUpdate {
    #[serde(flatten)]
    #[validate(nested)]
    pub changes: EventChanges,
    pub state_action: Option<AdminStateAction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use ewm_types::datetime;

    pub(crate) fn sample(limit: u32, moderation: bool) -> Event {
        let input = NewEvent {
            annotation: "An annotation long enough".into(),
            category: 1,
            description: "A description long enough".into(),
            event_date: datetime::parse("2030-01-01 18:00:00").unwrap(),
            location: Location { lat: 55.75, lon: 37.62 },
            paid: false,
            participant_limit: limit,
            request_moderation: moderation,
            title: "Concert".into(),
        };
        Event::new(1, 10, input, datetime::parse("2029-12-01 12:00:00").unwrap())
    }

    #[test]
    fn test_new_event_is_pending() {
        let event = sample(5, true);
        assert_eq!(event.state, EventState::Pending);
        assert_eq!(event.confirmed_requests, 0);
        assert!(event.published_on.is_none());
    }

    #[test]
    fn test_try_admit_respects_limit() {
        let mut event = sample(2, true);
        assert!(event.try_admit(1));
        assert!(!event.try_admit(2));
        assert_eq!(event.confirmed_requests, 1);
        assert!(event.try_admit(1));
        assert!(event.is_full());
        assert_eq!(event.free_places(), Some(0));
        assert!(!event.try_admit(1));

        event.release();
        assert_eq!(event.confirmed_requests, 1);
    }

    #[test]
    fn test_unlimited_event_always_admits() {
        let mut event = sample(0, true);
        assert!(event.try_admit(1000));
        assert!(!event.is_full());
        assert_eq!(event.free_places(), None);
    }

    #[test]
    fn test_publish_and_reject() {
        let now = datetime::now();
        let mut event = sample(0, true);
        event.publish(now).unwrap();
        assert!(event.is_published());
        assert_eq!(event.published_on, Some(now));

        assert!(matches!(
            event.reject(),
            Err(EwmError::InvalidEventTransition { .. })
        ));
        assert!(event.publish(now).is_err());
        assert!(event.send_to_review().is_err());
    }

    #[test]
    fn test_initiator_review_cycle() {
        let mut event = sample(0, true);
        event.cancel_review().unwrap();
        assert_eq!(event.state, EventState::Canceled);
        assert!(event.publish(datetime::now()).is_err());
        event.send_to_review().unwrap();
        assert_eq!(event.state, EventState::Pending);
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!("PUBLISHED".parse::<EventState>().unwrap(), EventState::Published);
        assert!("published".parse::<EventState>().is_err());
    }

    #[test]
    fn test_new_event_wire_format() {
        let json = r#"{
            "annotation": "Annotation of twenty chars",
            "category": 3,
            "description": "Description of twenty chars",
            "eventDate": "2030-05-05 10:00:00",
            "location": {"lat": 1.5, "lon": 2.5},
            "title": "Title"
        }"#;
        let input: NewEvent = serde_json::from_str(json).unwrap();
        assert!(!input.paid);
        assert_eq!(input.participant_limit, 0);
        assert!(input.request_moderation);
        assert!(validate(&input).is_ok());

        let short: NewEvent =
            serde_json::from_str(&json.replace("Title", "Ti")).unwrap();
        assert!(validate(&short).is_err());
    }

    #[test]
    fn test_update_wire_format() {
        let json = r#"{"title": "New title", "eventDate": "2031-01-01 00:00:00", "stateAction": "PUBLISH_EVENT"}"#;
        let update: AdminEventUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.state_action, Some(AdminStateAction::PublishEvent));
        assert_eq!(update.changes.title.as_deref(), Some("New title"));
        assert!(update.changes.event_date.is_some());
        assert!(update.changes.annotation.is_none());

        let bad: UserEventUpdate = serde_json::from_str(r#"{"annotation": "short"}"#).unwrap();
        assert!(validate(&bad).is_err());
    }

    #[test]
    fn test_apply_changes() {
        let mut event = sample(0, true);
        event.apply(EventChanges {
            paid: Some(true),
            participant_limit: Some(7),
            ..Default::default()
        });
        assert!(event.paid);
        assert_eq!(event.participant_limit, 7);
        assert_eq!(event.title, "Concert");
    }
}
