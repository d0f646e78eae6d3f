//! # EWM Service
//!
//! Main service of Explore With Me: users publish events, others ask to
//! join them, administrators moderate events and curate compilations.
//! Public event pages are counted by the stats service.
//!
//! ## Modules
//!
//! - [`category_api`]: category administration and listing
//! - [`user_api`]: user administration
//! - [`event_api`]: event lifecycle and search
//! - [`request_api`]: participation requests
//! - [`compilation_api`]: compilations
//! - [`comment_api`]: comments and their moderation
//! - [`views`]: hit recording and view counts
//!
//! ## Example
//!
//! ```bash
//! curl -X POST http://localhost:8080/admin/users \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Ann", "email": "ann@example.com"}'
//!
//! curl "http://localhost:8080/events?text=jazz&onlyAvailable=true&sort=VIEWS"
//! ```

pub mod api;
pub mod category_api;
pub mod comment_api;
pub mod compilation_api;
pub mod config;
pub mod dto;
pub mod event_api;
pub mod request_api;
pub mod user_api;
pub mod views;

pub use api::{create_router, ApiError, AppState, ClientIp};
pub use config::ServiceConfig;
pub use views::ViewTracker;
