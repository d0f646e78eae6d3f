//! Error types for ewm operations.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{EventState, RequestStatus};

/// Failure category; the HTTP layer maps each to one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    BadRequest,
}

/// Errors that can occur during ewm operations.
#[derive(Debug, Error)]
pub enum EwmError {
    // ---- not found ----
    /// User not found.
    #[error("User with id={id} was not found")]
    UserNotFound { id: u64 },

    /// Category not found.
    #[error("Category with id={id} was not found")]
    CategoryNotFound { id: u64 },

    /// Event not found, or not visible to the caller.
    #[error("Event with id={id} was not found")]
    EventNotFound { id: u64 },

    /// Participation request not found.
    #[error("Request with id={id} was not found")]
    RequestNotFound { id: u64 },

    /// A batch update named no requests of the event.
    #[error("No requests of event id={event_id} match the given ids")]
    NoRequestsMatched { event_id: u64 },

    /// Compilation not found.
    #[error("Compilation with id={id} was not found")]
    CompilationNotFound { id: u64 },

    /// Comment not found.
    #[error("Comment with id={id} was not found")]
    CommentNotFound { id: u64 },

    // ---- forbidden ----
    /// Caller is not the event's initiator.
    #[error("User id={user_id} is not the initiator of event id={event_id}")]
    NotInitiator { user_id: u64, event_id: u64 },

    /// Caller is not the request's author.
    #[error("User id={user_id} did not make request id={request_id}")]
    NotRequester { user_id: u64, request_id: u64 },

    /// Caller is not the comment's author.
    #[error("User id={user_id} is not the author of comment id={comment_id}")]
    NotAuthor { user_id: u64, comment_id: u64 },

    // ---- conflict ----
    /// The event has no free places.
    #[error("The participant limit of event id={event_id} has been reached")]
    ParticipantLimitReached { event_id: u64 },

    /// The user already asked to join the event.
    #[error("User id={user_id} already requested to join event id={event_id}")]
    DuplicateRequest { user_id: u64, event_id: u64 },

    /// The initiator asked to join their own event.
    #[error("The initiator cannot request to join their own event id={event_id}")]
    InitiatorRequest { event_id: u64 },

    /// The event must be published for this operation.
    #[error("Event id={event_id} is not published")]
    EventNotPublished { event_id: u64 },

    /// The event does not moderate requests.
    #[error("Event id={event_id} does not require request confirmation")]
    ConfirmationNotRequired { event_id: u64 },

    /// A batch update contained a request that was already decided.
    #[error("Request id={request_id} is {status}, only PENDING requests can be updated")]
    RequestNotPending {
        request_id: u64,
        status: RequestStatus,
    },

    /// Illegal request status change.
    #[error("Cannot {action} request id={request_id} in status {status}")]
    InvalidRequestTransition {
        request_id: u64,
        action: &'static str,
        status: RequestStatus,
    },

    /// Illegal event state change.
    #[error("Cannot {action} event id={event_id} in state {state}")]
    InvalidEventTransition {
        event_id: u64,
        action: &'static str,
        state: EventState,
    },

    /// Category name already used.
    #[error("Category name '{name}' is already in use")]
    CategoryNameTaken { name: String },

    /// Category still referenced by events.
    #[error("Category id={id} is not empty")]
    CategoryInUse { id: u64 },

    /// Email already registered.
    #[error("User with email '{email}' already exists")]
    EmailTaken { email: String },

    /// User still referenced by events, requests or comments.
    #[error("User id={id} still owns events, requests or comments")]
    UserInUse { id: u64 },

    // ---- bad request ----
    /// Event date too close to now.
    #[error("Event date {event_date} must be at least {hours} hour(s) from now")]
    EventDateTooSoon {
        event_date: NaiveDateTime,
        hours: i64,
    },

    /// Time window ends before it starts.
    #[error("Range start {start} is after range end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Batch target status other than CONFIRMED / REJECTED.
    #[error("Requests can only be set to CONFIRMED or REJECTED, not {status}")]
    InvalidTargetStatus { status: RequestStatus },

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),
}

impl EwmError {
    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        use EwmError::*;
        match self {
            UserNotFound { .. }
            | CategoryNotFound { .. }
            | EventNotFound { .. }
            | RequestNotFound { .. }
            | NoRequestsMatched { .. }
            | CompilationNotFound { .. }
            | CommentNotFound { .. } => ErrorKind::NotFound,
            NotInitiator { .. } | NotRequester { .. } | NotAuthor { .. } => ErrorKind::Forbidden,
            ParticipantLimitReached { .. }
            | DuplicateRequest { .. }
            | InitiatorRequest { .. }
            | EventNotPublished { .. }
            | ConfirmationNotRequired { .. }
            | RequestNotPending { .. }
            | InvalidRequestTransition { .. }
            | InvalidEventTransition { .. }
            | CategoryNameTaken { .. }
            | CategoryInUse { .. }
            | EmailTaken { .. }
            | UserInUse { .. } => ErrorKind::Conflict,
            EventDateTooSoon { .. }
            | InvalidRange { .. }
            | InvalidTargetStatus { .. }
            | Validation(_) => ErrorKind::BadRequest,
        }
    }
}

impl From<ewm_types::ParamError> for EwmError {
    fn from(e: ewm_types::ParamError) -> Self {
        EwmError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(EwmError::EventNotFound { id: 1 }.kind(), ErrorKind::NotFound);
        assert_eq!(
            EwmError::NotRequester {
                user_id: 1,
                request_id: 2
            }
            .kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            EwmError::InitiatorRequest { event_id: 1 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            EwmError::Validation("x".into()).kind(),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn test_messages_name_the_entity() {
        let e = EwmError::RequestNotPending {
            request_id: 9,
            status: RequestStatus::Canceled,
        };
        assert_eq!(
            e.to_string(),
            "Request id=9 is CANCELED, only PENDING requests can be updated"
        );
    }
}
