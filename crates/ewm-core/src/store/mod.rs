//! In-memory storage and the operations over it.
//!
//! Tables are plain ordered maps keyed by id, held together behind one
//! `RwLock`. Operations are split by entity across the submodules; each one
//! takes the lock once and either finishes or leaves the tables untouched.

mod categories;
mod comments;
mod compilations;
mod events;
mod requests;
mod users;

use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::{
    Category, Comment, CommentDetails, Compilation, CompilationDetails, Event, EventDetails,
    EwmError, ParticipationRequest, Result, User, UserShort,
};

/// Thread-safe store for every ewm entity.
#[derive(Default)]
pub struct EwmStore {
    tables: RwLock<Tables>,
}

impl EwmStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-table id sequences, starting at 1.
#[derive(Default)]
struct Sequences {
    user: u64,
    category: u64,
    event: u64,
    request: u64,
    compilation: u64,
    comment: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<u64, User>,
    categories: BTreeMap<u64, Category>,
    events: BTreeMap<u64, Event>,
    requests: BTreeMap<u64, ParticipationRequest>,
    compilations: BTreeMap<u64, Compilation>,
    comments: BTreeMap<u64, Comment>,
    seq: Sequences,
}

impl Tables {
    fn user(&self, id: u64) -> Result<&User> {
        self.users.get(&id).ok_or(EwmError::UserNotFound { id })
    }

    fn category(&self, id: u64) -> Result<&Category> {
        self.categories
            .get(&id)
            .ok_or(EwmError::CategoryNotFound { id })
    }

    fn event(&self, id: u64) -> Result<&Event> {
        self.events.get(&id).ok_or(EwmError::EventNotFound { id })
    }

    fn event_mut(&mut self, id: u64) -> Result<&mut Event> {
        self.events
            .get_mut(&id)
            .ok_or(EwmError::EventNotFound { id })
    }

    fn request(&self, id: u64) -> Result<&ParticipationRequest> {
        self.requests
            .get(&id)
            .ok_or(EwmError::RequestNotFound { id })
    }

    fn compilation(&self, id: u64) -> Result<&Compilation> {
        self.compilations
            .get(&id)
            .ok_or(EwmError::CompilationNotFound { id })
    }

    fn comment(&self, id: u64) -> Result<&Comment> {
        self.comments
            .get(&id)
            .ok_or(EwmError::CommentNotFound { id })
    }

    fn event_details(&self, event: &Event) -> Result<EventDetails> {
        Ok(EventDetails {
            event: event.clone(),
            category: self.category(event.category_id)?.clone(),
            initiator: UserShort::from(self.user(event.initiator_id)?),
        })
    }

    fn compilation_details(&self, compilation: &Compilation) -> Result<CompilationDetails> {
        let events = compilation
            .events
            .iter()
            .filter_map(|id| self.events.get(id))
            .map(|e| self.event_details(e))
            .collect::<Result<Vec<_>>>()?;
        Ok(CompilationDetails {
            compilation: compilation.clone(),
            events,
        })
    }

    fn comment_details(&self, comment: &Comment) -> Result<CommentDetails> {
        Ok(CommentDetails {
            comment: comment.clone(),
            author: UserShort::from(self.user(comment.author_id)?),
            event: self.event_details(self.event(comment.event_id)?)?,
        })
    }
}
