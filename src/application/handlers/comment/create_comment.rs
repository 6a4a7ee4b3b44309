//! CreateCommentHandler - Command handler for inserting comments.

use crate::domain::comment::{Comment, CommentError};
use crate::ports::StoreSession;

/// Command to create a new comment.
///
/// Carries only client-controlled fields; id and time are assigned here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCommentCommand {
    pub author: String,
    pub text: String,
}

/// Handler for creating comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCommentHandler;

impl CreateCommentHandler {
    pub fn new() -> Self {
        Self
    }

    /// Assign identity and time, then write the comment once.
    ///
    /// No retry: a failed write is returned to the caller as-is.
    pub async fn handle(
        &self,
        session: &mut dyn StoreSession,
        cmd: CreateCommentCommand,
    ) -> Result<Comment, CommentError> {
        let comment = Comment::new(cmd.author, cmd.text);

        session.insert_comment(&comment).await.map_err(|e| {
            tracing::warn!(error = %e, "comment insert rejected by store");
            CommentError::write_failed(e.to_string())
        })?;

        tracing::debug!(id = %comment.id(), "comment created");
        Ok(comment)
    }
}
