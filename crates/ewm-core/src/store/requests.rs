//! Participation requests.
//!
//! Every operation here that changes a request's status also adjusts its
//! event's `confirmed_requests` under the same write lock. Admission goes
//! through [`Event::try_admit`], which refuses to pass the participant limit.
//!
//! [`Event::try_admit`]: crate::Event::try_admit

use chrono::NaiveDateTime;

use super::{next, EwmStore};
use crate::{
    EwmError, ParticipationRequest, RequestStatus, Result, StatusUpdate, StatusUpdateResult,
};

impl EwmStore {
    // ==================== Requester ====================

    /// Asks to join an event.
    ///
    /// The request is confirmed at once when the event is unlimited or does
    /// not moderate requests; otherwise it waits as PENDING.
    pub fn create_request(
        &self,
        user_id: u64,
        event_id: u64,
        now: NaiveDateTime,
    ) -> Result<ParticipationRequest> {
        let mut tables = self.tables.write();
        tables.user(user_id)?;
        let event = tables.event(event_id)?;

        if event.is_full() {
            return Err(EwmError::ParticipantLimitReached { event_id });
        }
        if tables
            .requests
            .values()
            .any(|r| r.event == event_id && r.requester == user_id)
        {
            return Err(EwmError::DuplicateRequest { user_id, event_id });
        }
        if event.initiator_id == user_id {
            return Err(EwmError::InitiatorRequest { event_id });
        }
        if !event.is_published() {
            return Err(EwmError::EventNotPublished { event_id });
        }

        let auto_confirm = event.participant_limit == 0 || !event.request_moderation;
        let status = if auto_confirm {
            if !tables.event_mut(event_id)?.try_admit(1) {
                return Err(EwmError::ParticipantLimitReached { event_id });
            }
            RequestStatus::Confirmed
        } else {
            RequestStatus::Pending
        };

        let id = next(&mut tables.seq.request);
        let request = ParticipationRequest::new(id, event_id, user_id, status, now);
        tables.requests.insert(id, request.clone());

        tracing::info!(request_id = id, event_id, user_id, status = %status, "participation request created");
        Ok(request)
    }

    /// Withdraws a request; a confirmed place goes back to the event.
    pub fn cancel_request(&self, user_id: u64, request_id: u64) -> Result<ParticipationRequest> {
        let mut tables = self.tables.write();
        tables.user(user_id)?;
        let mut request = tables.request(request_id)?.clone();
        if request.requester != user_id {
            return Err(EwmError::NotRequester {
                user_id,
                request_id,
            });
        }

        let previous = request.cancel()?;
        if previous == RequestStatus::Confirmed {
            tables.event_mut(request.event)?.release();
        }
        tables.requests.insert(request_id, request.clone());

        tracing::info!(request_id, user_id, previous = %previous, "participation request canceled");
        Ok(request)
    }

    /// Requests made by `user_id`, oldest first.
    pub fn own_requests(&self, user_id: u64) -> Result<Vec<ParticipationRequest>> {
        let tables = self.tables.read();
        tables.user(user_id)?;
        Ok(tables
            .requests
            .values()
            .filter(|r| r.requester == user_id)
            .cloned()
            .collect())
    }

    // ==================== Initiator ====================

    /// Requests to join one of the initiator's events.
    pub fn event_requests(&self, user_id: u64, event_id: u64) -> Result<Vec<ParticipationRequest>> {
        let tables = self.tables.read();
        tables.user(user_id)?;
        let event = tables.event(event_id)?;
        if event.initiator_id != user_id {
            return Err(EwmError::NotInitiator { user_id, event_id });
        }
        Ok(tables
            .requests
            .values()
            .filter(|r| r.event == event_id)
            .cloned()
            .collect())
    }

    /// Confirms or rejects a batch of PENDING requests.
    ///
    /// Confirmation walks the ids in the given order and confirms as many as
    /// the event has room for; the rest are rejected. Either the whole batch
    /// is applied or nothing is.
    pub fn update_request_statuses(
        &self,
        user_id: u64,
        event_id: u64,
        update: StatusUpdate,
    ) -> Result<StatusUpdateResult> {
        let mut tables = self.tables.write();
        tables.user(user_id)?;
        let mut event = tables.event(event_id)?.clone();
        if event.initiator_id != user_id {
            return Err(EwmError::NotInitiator { user_id, event_id });
        }
        if !matches!(
            update.status,
            RequestStatus::Confirmed | RequestStatus::Rejected
        ) {
            return Err(EwmError::InvalidTargetStatus {
                status: update.status,
            });
        }
        if event.confirmed_requests >= event.participant_limit {
            return Err(EwmError::ParticipantLimitReached { event_id });
        }
        if !event.request_moderation || event.participant_limit == 0 {
            return Err(EwmError::ConfirmationNotRequired { event_id });
        }

        let mut ids = update.request_ids;
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(*id));
        if ids.is_empty() {
            return Err(EwmError::NoRequestsMatched { event_id });
        }

        let mut batch = Vec::with_capacity(ids.len());
        for id in ids {
            let request = tables
                .requests
                .get(&id)
                .filter(|r| r.event == event_id)
                .ok_or(EwmError::RequestNotFound { id })?;
            if request.status != RequestStatus::Pending {
                return Err(EwmError::RequestNotPending {
                    request_id: id,
                    status: request.status,
                });
            }
            batch.push(request.clone());
        }

        let mut result = StatusUpdateResult::default();
        match update.status {
            RequestStatus::Confirmed => {
                let free = event.free_places().unwrap_or(u32::MAX) as usize;
                let admitted = free.min(batch.len());
                if !event.try_admit(admitted as u32) {
                    return Err(EwmError::ParticipantLimitReached { event_id });
                }
                for (i, mut request) in batch.into_iter().enumerate() {
                    if i < admitted {
                        request.confirm()?;
                        result.confirmed_requests.push(request);
                    } else {
                        request.reject()?;
                        result.rejected_requests.push(request);
                    }
                }
            }
            _ => {
                for mut request in batch {
                    request.reject()?;
                    result.rejected_requests.push(request);
                }
            }
        }

        for request in result
            .confirmed_requests
            .iter()
            .chain(&result.rejected_requests)
        {
            tables.requests.insert(request.id, request.clone());
        }
        let confirmed = event.confirmed_requests;
        tables.events.insert(event_id, event);

        tracing::info!(
            event_id,
            confirmed = result.confirmed_requests.len(),
            rejected = result.rejected_requests.len(),
            total_confirmed = confirmed,
            "request statuses updated"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::*;

    fn confirm(ids: Vec<u64>) -> StatusUpdate {
        StatusUpdate {
            request_ids: ids,
            status: RequestStatus::Confirmed,
        }
    }

    fn confirmed_count(fx: &Fixture) -> u32 {
        fx.store
            .user_event(fx.initiator, fx.event)
            .unwrap()
            .event
            .confirmed_requests
    }

    #[test]
    fn test_unlimited_event_confirms_immediately() {
        let fx = Fixture::published(0, true);
        let guest = fx.user("guest");
        let request = fx.store.create_request(guest, fx.event, now()).unwrap();
        assert_eq!(request.status, RequestStatus::Confirmed);
        assert_eq!(request.created, now());
        assert_eq!(confirmed_count(&fx), 1);
    }

    #[test]
    fn test_moderation_off_confirms_while_room_left() {
        let fx = Fixture::published(1, false);
        let first = fx.user("first");
        let second = fx.user("second");
        assert_eq!(
            fx.store.create_request(first, fx.event, now()).unwrap().status,
            RequestStatus::Confirmed
        );
        assert!(matches!(
            fx.store.create_request(second, fx.event, now()),
            Err(EwmError::ParticipantLimitReached { .. })
        ));
        assert_eq!(confirmed_count(&fx), 1);
    }

    #[test]
    fn test_moderated_event_keeps_pending() {
        let fx = Fixture::published(5, true);
        let guest = fx.user("guest");
        let request = fx.store.create_request(guest, fx.event, now()).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(confirmed_count(&fx), 0);
    }

    #[test]
    fn test_create_conflicts() {
        let fx = Fixture::published(5, true);
        let guest = fx.user("guest");
        fx.store.create_request(guest, fx.event, now()).unwrap();
        assert!(matches!(
            fx.store.create_request(guest, fx.event, now()),
            Err(EwmError::DuplicateRequest { .. })
        ));
        assert!(matches!(
            fx.store.create_request(fx.initiator, fx.event, now()),
            Err(EwmError::InitiatorRequest { .. })
        ));
        assert!(matches!(
            fx.store.create_request(99, fx.event, now()),
            Err(EwmError::UserNotFound { .. })
        ));
        assert!(matches!(
            fx.store.create_request(guest, 99, now()),
            Err(EwmError::EventNotFound { .. })
        ));
    }

    #[test]
    fn test_request_to_pending_event() {
        let fx = Fixture::pending(0, true);
        let guest = fx.user("guest");
        assert!(matches!(
            fx.store.create_request(guest, fx.event, now()),
            Err(EwmError::EventNotPublished { .. })
        ));
    }

    #[test]
    fn test_cancel_gives_place_back() {
        let fx = Fixture::published(0, true);
        let guest = fx.user("guest");
        let request = fx.store.create_request(guest, fx.event, now()).unwrap();
        assert_eq!(confirmed_count(&fx), 1);

        let canceled = fx.store.cancel_request(guest, request.id).unwrap();
        assert_eq!(canceled.status, RequestStatus::Canceled);
        assert_eq!(confirmed_count(&fx), 0);

        assert!(matches!(
            fx.store.cancel_request(guest, request.id),
            Err(EwmError::InvalidRequestTransition { .. })
        ));
        assert_eq!(confirmed_count(&fx), 0);
    }

    #[test]
    fn test_cancel_pending_keeps_counter() {
        let fx = Fixture::published(2, true);
        let a = fx.user("aaa");
        let b = fx.user("bbb");
        let ra = fx.store.create_request(a, fx.event, now()).unwrap();
        let rb = fx.store.create_request(b, fx.event, now()).unwrap();
        fx.store
            .update_request_statuses(fx.initiator, fx.event, confirm(vec![ra.id]))
            .unwrap();
        assert_eq!(confirmed_count(&fx), 1);

        fx.store.cancel_request(b, rb.id).unwrap();
        assert_eq!(confirmed_count(&fx), 1);
    }

    #[test]
    fn test_cancel_by_someone_else() {
        let fx = Fixture::published(0, true);
        let guest = fx.user("guest");
        let other = fx.user("other");
        let request = fx.store.create_request(guest, fx.event, now()).unwrap();
        assert!(matches!(
            fx.store.cancel_request(other, request.id),
            Err(EwmError::NotRequester { .. })
        ));
        assert!(matches!(
            fx.store.cancel_request(guest, 42),
            Err(EwmError::RequestNotFound { id: 42 })
        ));
    }

    #[test]
    fn test_confirm_overflow_is_rejected() {
        let fx = Fixture::published(1, true);
        let r1 = fx
            .store
            .create_request(fx.user("one"), fx.event, now())
            .unwrap();
        let r2 = fx
            .store
            .create_request(fx.user("two"), fx.event, now())
            .unwrap();

        let result = fx
            .store
            .update_request_statuses(fx.initiator, fx.event, confirm(vec![r1.id, r2.id]))
            .unwrap();
        assert_eq!(result.confirmed_requests.len(), 1);
        assert_eq!(result.confirmed_requests[0].id, r1.id);
        assert_eq!(result.rejected_requests.len(), 1);
        assert_eq!(result.rejected_requests[0].id, r2.id);
        assert_eq!(confirmed_count(&fx), 1);

        // the event is now full
        assert!(matches!(
            fx.store
                .update_request_statuses(fx.initiator, fx.event, confirm(vec![r2.id])),
            Err(EwmError::ParticipantLimitReached { .. })
        ));
    }

    #[test]
    fn test_batch_with_decided_request_fails_whole() {
        let fx = Fixture::published(5, true);
        let r1 = fx
            .store
            .create_request(fx.user("one"), fx.event, now())
            .unwrap();
        let guest = fx.user("two");
        let r2 = fx.store.create_request(guest, fx.event, now()).unwrap();
        fx.store.cancel_request(guest, r2.id).unwrap();

        assert!(matches!(
            fx.store
                .update_request_statuses(fx.initiator, fx.event, confirm(vec![r1.id, r2.id])),
            Err(EwmError::RequestNotPending { request_id, status: RequestStatus::Canceled })
                if request_id == r2.id
        ));
        let requests = fx.store.event_requests(fx.initiator, fx.event).unwrap();
        assert_eq!(requests[0].status, RequestStatus::Pending);
        assert_eq!(confirmed_count(&fx), 0);
    }

    #[test]
    fn test_reject_batch() {
        let fx = Fixture::published(5, true);
        let r1 = fx
            .store
            .create_request(fx.user("one"), fx.event, now())
            .unwrap();
        let r2 = fx
            .store
            .create_request(fx.user("two"), fx.event, now())
            .unwrap();
        let result = fx
            .store
            .update_request_statuses(
                fx.initiator,
                fx.event,
                StatusUpdate {
                    request_ids: vec![r2.id, r1.id, r2.id],
                    status: RequestStatus::Rejected,
                },
            )
            .unwrap();
        assert!(result.confirmed_requests.is_empty());
        let ids: Vec<_> = result.rejected_requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![r2.id, r1.id]);
    }

    #[test]
    fn test_batch_preconditions() {
        let fx = Fixture::published(5, true);
        let guest = fx.user("guest");
        let request = fx.store.create_request(guest, fx.event, now()).unwrap();

        assert!(matches!(
            fx.store
                .update_request_statuses(guest, fx.event, confirm(vec![request.id])),
            Err(EwmError::NotInitiator { .. })
        ));
        assert!(matches!(
            fx.store.update_request_statuses(
                fx.initiator,
                fx.event,
                StatusUpdate {
                    request_ids: vec![request.id],
                    status: RequestStatus::Pending,
                }
            ),
            Err(EwmError::InvalidTargetStatus { .. })
        ));
        assert!(matches!(
            fx.store
                .update_request_statuses(fx.initiator, fx.event, confirm(vec![])),
            Err(EwmError::NoRequestsMatched { .. })
        ));
        assert!(matches!(
            fx.store
                .update_request_statuses(fx.initiator, fx.event, confirm(vec![request.id, 77])),
            Err(EwmError::RequestNotFound { id: 77 })
        ));
    }

    #[test]
    fn test_batch_on_unmoderated_event() {
        let fx = Fixture::published(5, false);
        let guest = fx.user("guest");
        let request = fx.store.create_request(guest, fx.event, now()).unwrap();
        assert!(matches!(
            fx.store
                .update_request_statuses(fx.initiator, fx.event, confirm(vec![request.id])),
            Err(EwmError::ConfirmationNotRequired { .. })
        ));
    }

    #[test]
    fn test_listings() {
        let fx = Fixture::published(0, true);
        let guest = fx.user("guest");
        fx.store.create_request(guest, fx.event, now()).unwrap();

        assert_eq!(fx.store.own_requests(guest).unwrap().len(), 1);
        assert!(fx.store.own_requests(fx.initiator).unwrap().is_empty());
        assert_eq!(
            fx.store.event_requests(fx.initiator, fx.event).unwrap().len(),
            1
        );
        assert!(matches!(
            fx.store.event_requests(guest, fx.event),
            Err(EwmError::NotInitiator { .. })
        ));
    }
}
