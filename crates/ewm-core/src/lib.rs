//! Domain model and business rules for ewm.
//!
//! All state lives in [`EwmStore`], an in-memory store guarded by a single
//! lock. Every mutating operation runs to completion under the write lock, so
//! a participation request's status and its event's confirmed counter always
//! change together.

mod category;
mod comment;
mod compilation;
mod error;
mod event;
mod participation;
pub mod search;
mod store;
mod user;
pub mod validation;

pub use category::{Category, NewCategory};
pub use comment::{Comment, CommentDetails, CommentText};
pub use compilation::{Compilation, CompilationDetails, CompilationUpdate, NewCompilation};
pub use error::{ErrorKind, EwmError};
pub use event::{
    AdminEventUpdate, AdminStateAction, Event, EventChanges, EventDetails, EventState, Location,
    NewEvent, UserEventUpdate, UserStateAction,
};
pub use participation::{ParticipationRequest, RequestStatus, StatusUpdate, StatusUpdateResult};
pub use search::{AdminEventFilter, CommentFilter, EventSort, PublicEventFilter, TimeRange};
pub use store::EwmStore;
pub use user::{NewUser, User, UserShort};

/// Result type for ewm operations.
pub type Result<T> = std::result::Result<T, EwmError>;
