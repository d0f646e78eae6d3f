//! Comments on published events.
//!
//! Adding and deleting a comment move its event's `comments_count` in the
//! same critical section.

use std::cmp::Reverse;

use chrono::NaiveDateTime;

use super::{next, EwmStore, Tables};
use crate::{
    validation::validate, Comment, CommentDetails, CommentFilter, CommentText, EwmError, Result,
};

impl Tables {
    fn search_comments(&self, filter: &CommentFilter) -> Result<Vec<CommentDetails>> {
        filter.range.validate()?;
        let mut found: Vec<&Comment> = self
            .comments
            .values()
            .filter(|c| filter.matches(c))
            .collect();
        found.sort_by_key(|c| (Reverse(c.created), Reverse(c.id)));
        filter
            .page
            .apply(found)
            .into_iter()
            .map(|c| self.comment_details(c))
            .collect()
    }

    fn remove_comment(&mut self, id: u64) -> Result<()> {
        let comment = self
            .comments
            .remove(&id)
            .ok_or(EwmError::CommentNotFound { id })?;
        let event = self.event_mut(comment.event_id)?;
        event.comments_count = event.comments_count.saturating_sub(1);
        Ok(())
    }
}

impl EwmStore {
    // ==================== Author ====================

    /// Comments on a published event.
    pub fn add_comment(
        &self,
        user_id: u64,
        event_id: u64,
        input: CommentText,
        now: NaiveDateTime,
    ) -> Result<CommentDetails> {
        validate(&input)?;

        let mut tables = self.tables.write();
        tables.user(user_id)?;
        if !tables.event(event_id)?.is_published() {
            return Err(EwmError::EventNotPublished { event_id });
        }

        let comment = Comment {
            id: next(&mut tables.seq.comment),
            text: input.text,
            author_id: user_id,
            event_id,
            created: now,
        };
        tables.event_mut(event_id)?.comments_count += 1;
        tables.comments.insert(comment.id, comment.clone());

        tracing::info!(comment_id = comment.id, event_id, user_id, "comment added");
        tables.comment_details(&comment)
    }

    /// Replaces the text of the caller's own comment.
    pub fn update_comment(
        &self,
        user_id: u64,
        comment_id: u64,
        input: CommentText,
    ) -> Result<CommentDetails> {
        validate(&input)?;

        let mut tables = self.tables.write();
        let mut comment = tables.comment(comment_id)?.clone();
        tables.user(user_id)?;
        if comment.author_id != user_id {
            return Err(EwmError::NotAuthor {
                user_id,
                comment_id,
            });
        }

        comment.text = input.text;
        tables.comments.insert(comment_id, comment.clone());

        tracing::info!(comment_id, user_id, "comment updated");
        tables.comment_details(&comment)
    }

    /// Deletes the caller's own comment.
    pub fn delete_comment(&self, user_id: u64, comment_id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        let author_id = tables.comment(comment_id)?.author_id;
        tables.user(user_id)?;
        if author_id != user_id {
            return Err(EwmError::NotAuthor {
                user_id,
                comment_id,
            });
        }
        tables.remove_comment(comment_id)?;

        tracing::info!(comment_id, user_id, "comment deleted");
        Ok(())
    }

    /// The caller's comments, newest first. `filter.author_ids` is ignored.
    pub fn own_comments(&self, user_id: u64, filter: &CommentFilter) -> Result<Vec<CommentDetails>> {
        let tables = self.tables.read();
        tables.user(user_id)?;
        let own = CommentFilter {
            author_ids: vec![user_id],
            ..filter.clone()
        };
        tables.search_comments(&own)
    }

    // ==================== Admin ====================

    /// Deletes any comment.
    pub fn delete_comment_by_admin(&self, comment_id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        tables.remove_comment(comment_id)?;

        tracing::info!(comment_id, "comment deleted by admin");
        Ok(())
    }

    /// Comment moderation search, newest first.
    pub fn search_comments(&self, filter: &CommentFilter) -> Result<Vec<CommentDetails>> {
        self.tables.read().search_comments(filter)
    }
}
