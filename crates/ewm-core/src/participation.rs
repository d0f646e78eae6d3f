//! Participation requests and their status machine.
//!
//! ```text
//! PENDING ──┬──> CONFIRMED ──> CANCELED
//!           ├──> REJECTED
//!           └──> CANCELED
//! ```
//!
//! CONFIRMED may only be left by its requester cancelling; REJECTED and
//! CANCELED are terminal.

use chrono::NaiveDateTime;
use ewm_types::datetime::serde_format;
use serde::{Deserialize, Serialize};

use crate::{EwmError, Result};

/// Status of a participation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

impl RequestStatus {
    /// Returns true for statuses that admit no further change.
    pub fn is_final(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Canceled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Confirmed => write!(f, "CONFIRMED"),
            RequestStatus::Rejected => write!(f, "REJECTED"),
            RequestStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// A user's request to take part in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRequest {
    pub id: u64,
    #[serde(with = "serde_format")]
    pub created: NaiveDateTime,
    /// Event id.
    pub event: u64,
    /// Requesting user id.
    pub requester: u64,
    pub status: RequestStatus,
}

impl ParticipationRequest {
    /// Creates a request in the given initial status.
    pub fn new(
        id: u64,
        event: u64,
        requester: u64,
        status: RequestStatus,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            created,
            event,
            requester,
            status,
        }
    }

    fn transition_error(&self, action: &'static str) -> EwmError {
        EwmError::InvalidRequestTransition {
            request_id: self.id,
            action,
            status: self.status,
        }
    }

    /// PENDING -> CONFIRMED.
    pub fn confirm(&mut self) -> Result<()> {
        if self.status != RequestStatus::Pending {
            return Err(self.transition_error("confirm"));
        }
        self.status = RequestStatus::Confirmed;
        Ok(())
    }

    /// PENDING -> REJECTED.
    pub fn reject(&mut self) -> Result<()> {
        if self.status != RequestStatus::Pending {
            return Err(self.transition_error("reject"));
        }
        self.status = RequestStatus::Rejected;
        Ok(())
    }

    /// PENDING | CONFIRMED -> CANCELED.
    ///
    /// Returns the previous status so the caller can give a confirmed place
    /// back.
    pub fn cancel(&mut self) -> Result<RequestStatus> {
        if self.status.is_final() {
            return Err(self.transition_error("cancel"));
        }
        let previous = self.status;
        self.status = RequestStatus::Canceled;
        Ok(previous)
    }
}

/// Batch decision by an event's initiator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub request_ids: Vec<u64>,
    pub status: RequestStatus,
}

/// Outcome of a batch decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResult {
    pub confirmed_requests: Vec<ParticipationRequest>,
    pub rejected_requests: Vec<ParticipationRequest>,
}
