//! Search filters for events and comments.
//!
//! Every predicate is optional; an empty list or `None` matches everything.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use ewm_types::{datetime, Page};

use crate::{Comment, Event, EventDetails, EventState, EwmError, Result};

/// Optional inclusive time bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Rejects a window whose start is after its end.
    pub fn validate(&self) -> Result<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(EwmError::InvalidRange { start, end }),
            _ => Ok(()),
        }
    }

    /// Fills missing bounds with `[now, now + 1 year]`.
    pub fn or_upcoming(&self, now: NaiveDateTime) -> Result<TimeRange> {
        let start = self.start.unwrap_or(now);
        let end = self.end.unwrap_or_else(|| datetime::plus_years(now, 1));
        let resolved = TimeRange::new(Some(start), Some(end));
        resolved.validate()?;
        Ok(resolved)
    }

    /// Returns true if `at` lies within the bounds that are set.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| at >= s) && self.end.is_none_or(|e| at <= e)
    }
}

fn matches_any<T: PartialEq>(wanted: &[T], value: &T) -> bool {
    wanted.is_empty() || wanted.contains(value)
}

/// Administrator event search.
#[derive(Debug, Clone, Default)]
pub struct AdminEventFilter {
    pub users: Vec<u64>,
    pub states: Vec<EventState>,
    pub categories: Vec<u64>,
    pub range: TimeRange,
    pub page: Page,
}

impl AdminEventFilter {
    pub(crate) fn matches(&self, event: &Event, range: &TimeRange) -> bool {
        matches_any(&self.users, &event.initiator_id)
            && matches_any(&self.states, &event.state)
            && matches_any(&self.categories, &event.category_id)
            && range.contains(event.event_date)
    }
}

/// Ordering of public search results, always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventSort {
    #[default]
    EventDate,
    Views,
    Comments,
}

impl FromStr for EventSort {
    type Err = EwmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "EVENT_DATE" => Ok(EventSort::EventDate),
            "VIEWS" => Ok(EventSort::Views),
            "COMMENTS" => Ok(EventSort::Comments),
            other => Err(EwmError::Validation(format!("Unknown sort: {other}"))),
        }
    }
}

impl EventSort {
    /// Sorts `events` in place; `views` is only read for [`EventSort::Views`].
    /// Ties fall back to ascending id.
    pub fn sort(&self, events: &mut [EventDetails], views: &HashMap<u64, u64>) {
        match self {
            EventSort::EventDate => {
                events.sort_by_key(|d| (Reverse(d.event.event_date), d.event.id))
            }
            EventSort::Comments => {
                events.sort_by_key(|d| (Reverse(d.event.comments_count), d.event.id))
            }
            EventSort::Views => events.sort_by_key(|d| {
                (
                    Reverse(views.get(&d.event.id).copied().unwrap_or(0)),
                    d.event.id,
                )
            }),
        }
    }
}

/// Public search over published events.
///
/// Carries no page: ordering by views needs counts from the stats service,
/// so callers page after sorting.
#[derive(Debug, Clone, Default)]
pub struct PublicEventFilter {
    /// Case-insensitive substring of annotation or description.
    pub text: Option<String>,
    pub categories: Vec<u64>,
    pub paid: Option<bool>,
    pub range: TimeRange,
    /// Skip events whose participant limit is reached.
    pub only_available: bool,
    pub sort: EventSort,
}

impl PublicEventFilter {
    pub(crate) fn matches(&self, event: &Event, range: &TimeRange) -> bool {
        if !event.is_published()
            || !matches_any(&self.categories, &event.category_id)
            || self.paid.is_some_and(|paid| event.paid != paid)
            || !range.contains(event.event_date)
            || (self.only_available && event.is_full())
        {
            return false;
        }
        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => {
                let needle = text.to_lowercase();
                event.annotation.to_lowercase().contains(&needle)
                    || event.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Comment search, used by administrators and by authors over their own
/// comments.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub event_ids: Vec<u64>,
    pub author_ids: Vec<u64>,
    pub range: TimeRange,
    pub page: Page,
}

impl CommentFilter {
    pub(crate) fn matches(&self, comment: &Comment) -> bool {
        matches_any(&self.event_ids, &comment.event_id)
            && matches_any(&self.author_ids, &comment.author_id)
            && self.range.contains(comment.created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        datetime::parse(s).unwrap()
    }

    #[test]
    fn test_range_defaults_to_next_year() {
        let now = at("2024-01-01 00:00:00");
        let range = TimeRange::default().or_upcoming(now).unwrap();
        assert_eq!(range.start, Some(now));
        assert_eq!(range.end, Some(at("2025-01-01 00:00:00")));
        assert!(range.contains(at("2024-06-01 00:00:00")));
        assert!(!range.contains(at("2023-12-31 23:59:59")));
    }

    #[test]
    fn test_range_covers_last_day_of_leap_year() {
        let range = TimeRange::default()
            .or_upcoming(at("2024-01-01 12:00:00"))
            .unwrap();
        assert!(range.contains(at("2024-12-31 18:00:00")));
        assert!(range.contains(at("2025-01-01 12:00:00")));
        assert!(!range.contains(at("2025-01-01 12:00:01")));
    }

    #[test]
    fn test_inverted_range() {
        let range = TimeRange::new(Some(at("2024-02-01 00:00:00")), Some(at("2024-01-01 00:00:00")));
        assert!(matches!(range.validate(), Err(EwmError::InvalidRange { .. })));

        let start_only = TimeRange::new(Some(at("2030-01-01 00:00:00")), None);
        assert!(start_only.validate().is_ok());
        assert!(start_only
            .or_upcoming(at("2024-01-01 00:00:00"))
            .is_err());
    }

    #[test]
    fn test_open_range_contains_everything() {
        assert!(TimeRange::default().contains(at("1999-01-01 00:00:00")));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("VIEWS".parse::<EventSort>().unwrap(), EventSort::Views);
        assert!("views".parse::<EventSort>().is_err());
    }
}
