//! ListCommentsHandler - Query handler for the most recent comments.

use crate::domain::comment::{Comment, CommentError, MAX_LISTED_COMMENTS};
use crate::ports::StoreSession;

/// Query for the most recent comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCommentsQuery {
    /// Requested number of comments, clamped to `MAX_LISTED_COMMENTS`.
    pub limit: usize,
}

impl ListCommentsQuery {
    /// Query for the newest comments up to the listing cap.
    pub fn recent() -> Self {
        Self {
            limit: MAX_LISTED_COMMENTS,
        }
    }

    fn effective_limit(&self) -> usize {
        self.limit.min(MAX_LISTED_COMMENTS)
    }
}

impl Default for ListCommentsQuery {
    fn default() -> Self {
        Self::recent()
    }
}

/// Handler for listing comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCommentsHandler;

impl ListCommentsHandler {
    pub fn new() -> Self {
        Self
    }

    /// Returns at most `MAX_LISTED_COMMENTS` comments, newest first.
    pub async fn handle(
        &self,
        session: &mut dyn StoreSession,
        query: ListCommentsQuery,
    ) -> Result<Vec<Comment>, CommentError> {
        let limit = query.effective_limit();

        let mut comments = session.recent_comments(limit).await.map_err(|e| {
            tracing::error!(error = %e, "comment listing failed");
            CommentError::read_failed(e.to_string())
        })?;

        // Adapters already sort and limit; re-applying keeps the contract
        // independent of adapter quirks.
        comments.sort_by(Comment::newest_first);
        comments.truncate(limit);
        Ok(comments)
    }
}
