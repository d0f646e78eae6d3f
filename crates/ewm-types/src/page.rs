//! Offset pagination.

use crate::{ParamError, Result};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// An offset window over an ordered list.
///
/// `from` is the number of elements to skip, not a page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub from: usize,
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Builds a page from raw request values.
    ///
    /// `from` must be non-negative and `size` strictly positive.
    pub fn new(from: Option<i64>, size: Option<i64>) -> Result<Self> {
        let from = from.unwrap_or(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE as i64);

        if from < 0 {
            return Err(ParamError::out_of_range("from", "must not be negative"));
        }
        if size <= 0 {
            return Err(ParamError::out_of_range("size", "must be positive"));
        }

        Ok(Self {
            from: from as usize,
            size: size as usize,
        })
    }

    /// Applies the window to an already ordered iterator.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.from).take(self.size).collect()
    }
}
