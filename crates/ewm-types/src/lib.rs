//! Wire conventions shared by the ewm services.
//!
//! Both the main service and the stats service exchange timestamps as
//! `yyyy-MM-dd HH:mm:ss`, page lists with `from`/`size` offsets and accept
//! list-valued query parameters either repeated or comma separated. This
//! crate keeps those rules in one place.

pub mod datetime;
mod error;
mod page;
mod query;

pub use error::ParamError;
pub use page::{Page, DEFAULT_PAGE_SIZE};
pub use query::QueryParams;

/// Result type for parameter parsing.
pub type Result<T> = std::result::Result<T, ParamError>;
