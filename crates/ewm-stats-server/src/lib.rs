//! # EWM Stats Server
//!
//! Standalone service that records endpoint hits and answers aggregate
//! view-count queries.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/hit` | Record a hit (201) |
//! | GET | `/stats?start&end&uris&unique` | Hit counts per (app, uri) |
//! | DELETE | `/test/reset-hits` | Drop every recorded hit |
//! | GET | `/health` | Liveness |

pub mod api;
pub mod config;

pub use api::{create_router, AppState};
pub use config::StatsConfig;
