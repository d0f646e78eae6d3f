//! # EWM Stats
//!
//! Records endpoint hits and aggregates them into per-URI view counts.
//!
//! - [`HitStore`]: in-memory hit log used by the stats server
//! - [`HttpStatsClient`]: reqwest client the main service uses to talk to it
//! - [`StatsSource`]: the seam both implement, so the main service can be
//!   tested against a local store

mod client;
mod error;
mod hit;
mod source;
mod store;

pub use client::HttpStatsClient;
pub use error::StatsError;
pub use hit::{EndpointHit, NewHit, StatsQuery, ViewStats};
pub use source::StatsSource;
pub use store::HitStore;

/// Result type for stats operations.
pub type Result<T> = std::result::Result<T, StatsError>;
