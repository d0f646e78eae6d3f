//! Error types for stats operations.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Stats errors.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The query window ends before it starts.
    #[error("start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// A hit is missing a required field.
    #[error("hit field '{field}' must not be blank")]
    BlankField { field: &'static str },

    /// The stats server could not be reached.
    #[error("stats server unreachable: {0}")]
    Network(String),

    /// The stats server answered with a non-success status.
    #[error("stats server returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The stats server answered with a body we could not decode.
    #[error("invalid stats response: {0}")]
    Decode(String),

    /// The configured base URL is unusable.
    #[error("invalid stats url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
