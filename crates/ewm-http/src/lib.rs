//! # EWM HTTP
//!
//! Plumbing shared by the ewm servers:
//!
//! - **Logging**: pretty or JSON `tracing` output behind an `EnvFilter`
//! - **Request IDs**: `x-request-id` propagation with a span per request
//! - **Error bodies**: the JSON error document every endpoint returns
//! - **Extractors**: body, path and query extraction that fail with that
//!   document instead of axum's plain-text rejections
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::Router;
//! use ewm_http::{init_logging, request_id_middleware, LogFormat};
//!
//! init_logging("info", LogFormat::Json);
//!
//! let app: Router<()> =
//!     Router::new().layer(axum::middleware::from_fn(request_id_middleware));
//! ```

mod error;
pub mod extract;
mod logging;
pub mod middleware;

pub use error::{error_response, ErrorBody};
pub use extract::{JsonBody, Params, PathParams};
pub use logging::{init_logging, LogFormat};
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
