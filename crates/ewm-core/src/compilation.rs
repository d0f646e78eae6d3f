//! Curated event compilations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;
use crate::EventDetails;

/// A titled, optionally pinned set of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilation {
    pub id: u64,
    pub title: String,
    pub pinned: bool,
    pub events: BTreeSet<u64>,
}

/// A compilation with its events resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationDetails {
    pub compilation: Compilation,
    pub events: Vec<EventDetails>,
}

/// Input for creating a compilation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCompilation {
    /// Event ids; unknown ids are dropped.
    #[serde(default)]
    pub events: BTreeSet<u64>,
    #[serde(default)]
    pub pinned: bool,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub title: String,
}

/// Partial update of a compilation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CompilationUpdate {
    /// Replaces the event set when present and non-empty.
    pub events: Option<BTreeSet<u64>>,
    pub pinned: Option<bool>,
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
}
