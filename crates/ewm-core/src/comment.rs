//! Comments on published events.

use chrono::NaiveDateTime;
use ewm_types::datetime::serde_format;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;
use crate::{EventDetails, UserShort};

/// A comment left by a user on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub text: String,
    pub author_id: u64,
    pub event_id: u64,
    #[serde(with = "serde_format")]
    pub created: NaiveDateTime,
}

/// A comment with its author and event resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: UserShort,
    pub event: EventDetails,
}

/// Body of a new or edited comment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentText {
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub text: String,
}

impl CommentText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
