//! Event creation, moderation and search.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use ewm_types::Page;

use super::{next, EwmStore};
use crate::{
    validation::validate, AdminEventFilter, AdminEventUpdate, AdminStateAction, Event,
    EventDetails, EventState, EwmError, NewEvent, PublicEventFilter, Result, UserEventUpdate,
    UserStateAction,
};

/// Minimum lead time when an initiator creates or edits an event.
const INITIATOR_LEAD_HOURS: i64 = 2;
/// Minimum lead time when an administrator edits an event.
const ADMIN_LEAD_HOURS: i64 = 1;

fn ensure_lead_time(event_date: NaiveDateTime, now: NaiveDateTime, hours: i64) -> Result<()> {
    if event_date <= now + Duration::hours(hours) {
        return Err(EwmError::EventDateTooSoon { event_date, hours });
    }
    Ok(())
}

impl EwmStore {
    // ==================== Initiator ====================

    /// Creates a PENDING event on behalf of `user_id`.
    pub fn create_event(
        &self,
        user_id: u64,
        input: NewEvent,
        now: NaiveDateTime,
    ) -> Result<EventDetails> {
        validate(&input)?;
        ensure_lead_time(input.event_date, now, INITIATOR_LEAD_HOURS)?;

        let mut tables = self.tables.write();
        tables.user(user_id)?;
        tables.category(input.category)?;

        let id = next(&mut tables.seq.event);
        let event = Event::new(id, user_id, input, now);
        let details = tables.event_details(&event)?;
        tables.events.insert(id, event);

        tracing::info!(event_id = id, user_id, title = %details.event.title, "event created");
        Ok(details)
    }

    /// Events initiated by `user_id`, newest first.
    pub fn user_events(&self, user_id: u64, page: Page) -> Result<Vec<EventDetails>> {
        let tables = self.tables.read();
        tables.user(user_id)?;
        page.apply(
            tables
                .events
                .values()
                .rev()
                .filter(|e| e.initiator_id == user_id),
        )
        .into_iter()
        .map(|e| tables.event_details(e))
        .collect()
    }

    /// One of the initiator's own events, in any state.
    pub fn user_event(&self, user_id: u64, event_id: u64) -> Result<EventDetails> {
        let tables = self.tables.read();
        tables.user(user_id)?;
        let event = tables.event(event_id)?;
        if event.initiator_id != user_id {
            return Err(EwmError::NotInitiator { user_id, event_id });
        }
        tables.event_details(event)
    }

    /// Edits an unpublished event and optionally moves it in or out of review.
    pub fn update_event_by_initiator(
        &self,
        user_id: u64,
        event_id: u64,
        update: UserEventUpdate,
        now: NaiveDateTime,
    ) -> Result<EventDetails> {
        validate(&update)?;

        let mut tables = self.tables.write();
        tables.user(user_id)?;
        let mut event = tables.event(event_id)?.clone();
        if event.initiator_id != user_id {
            return Err(EwmError::NotInitiator { user_id, event_id });
        }
        if let Some(date) = update.changes.event_date {
            ensure_lead_time(date, now, INITIATOR_LEAD_HOURS)?;
        }
        if event.is_published() {
            return Err(EwmError::InvalidEventTransition {
                event_id,
                action: "update",
                state: event.state,
            });
        }
        if let Some(category) = update.changes.category {
            tables.category(category)?;
        }

        event.apply(update.changes);
        match update.state_action {
            Some(UserStateAction::SendToReview) => event.send_to_review()?,
            Some(UserStateAction::CancelReview) => event.cancel_review()?,
            None => {}
        }

        let details = tables.event_details(&event)?;
        tables.events.insert(event_id, event);

        tracing::info!(event_id, user_id, state = %details.event.state, "event updated by initiator");
        Ok(details)
    }

    // ==================== Admin ====================

    /// Edits a PENDING event and optionally publishes or rejects it.
    pub fn update_event_by_admin(
        &self,
        event_id: u64,
        update: AdminEventUpdate,
        now: NaiveDateTime,
    ) -> Result<EventDetails> {
        validate(&update)?;

        let mut tables = self.tables.write();
        let mut event = tables.event(event_id)?.clone();
        if matches!(event.state, EventState::Canceled | EventState::Published) {
            return Err(EwmError::InvalidEventTransition {
                event_id,
                action: "update",
                state: event.state,
            });
        }
        if let Some(date) = update.changes.event_date {
            ensure_lead_time(date, now, ADMIN_LEAD_HOURS)?;
        }
        if let Some(category) = update.changes.category {
            tables.category(category)?;
        }

        match update.state_action {
            Some(AdminStateAction::PublishEvent) => event.publish(now)?,
            Some(AdminStateAction::RejectEvent) => event.reject()?,
            None => {}
        }
        event.apply(update.changes);

        let details = tables.event_details(&event)?;
        tables.events.insert(event_id, event);

        tracing::info!(event_id, state = %details.event.state, "event updated by admin");
        Ok(details)
    }

    /// Administrator search, event date descending.
    ///
    /// Missing range bounds default to `[now, now + 1 year]`.
    pub fn search_events_admin(
        &self,
        filter: &AdminEventFilter,
        now: NaiveDateTime,
    ) -> Result<Vec<EventDetails>> {
        let range = filter.range.or_upcoming(now)?;

        let tables = self.tables.read();
        let mut found: Vec<&Event> = tables
            .events
            .values()
            .filter(|e| filter.matches(e, &range))
            .collect();
        found.sort_by_key(|e| (Reverse(e.event_date), e.id));

        filter
            .page
            .apply(found)
            .into_iter()
            .map(|e| tables.event_details(e))
            .collect()
    }

    // ==================== Public ====================

    /// Every published event matching `filter`, in `filter.sort` order.
    ///
    /// View counts are not known here, so a view ordering comes back by id
    /// and the caller re-sorts once it has the counts.
    pub fn search_published(
        &self,
        filter: &PublicEventFilter,
        now: NaiveDateTime,
    ) -> Result<Vec<EventDetails>> {
        let range = filter.range.or_upcoming(now)?;

        let tables = self.tables.read();
        let mut found = tables
            .events
            .values()
            .filter(|e| filter.matches(e, &range))
            .map(|e| tables.event_details(e))
            .collect::<Result<Vec<_>>>()?;
        filter.sort.sort(&mut found, &HashMap::new());
        Ok(found)
    }

    /// A published event; any other state reads as not found.
    pub fn published_event(&self, id: u64) -> Result<EventDetails> {
        let tables = self.tables.read();
        let event = tables.event(id)?;
        if !event.is_published() {
            return Err(EwmError::EventNotFound { id });
        }
        tables.event_details(event)
    }
}
