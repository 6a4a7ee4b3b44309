//! Comment entity.

use crate::domain::foundation::{CommentId, Timestamp};

/// Upper bound on the number of comments returned by a listing.
pub const MAX_LISTED_COMMENTS: usize = 100;

/// A single user-submitted comment.
///
/// # Invariants
///
/// - `id` is globally unique and assigned by the server
/// - `when` is assigned by the server at creation time
/// - Comments are immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Unique identifier, rendered as 24 hex characters.
    id: CommentId,

    /// Free-text author name.
    author: String,

    /// Free-text body.
    text: String,

    /// When the comment was created.
    when: Timestamp,
}

impl Comment {
    /// Creates a new comment with a fresh identifier, stamped now.
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        let when = Timestamp::now();
        Self {
            id: CommentId::generate_at(when),
            author: author.into(),
            text: text.into(),
            when,
        }
    }

    /// Reconstitute a comment from persistence (no id or time assignment).
    pub fn reconstitute(
        id: CommentId,
        author: String,
        text: String,
        when: Timestamp,
    ) -> Self {
        Self {
            id,
            author,
            text,
            when,
        }
    }

    /// Returns the comment ID.
    pub fn id(&self) -> &CommentId {
        &self.id
    }

    /// Returns the author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the comment body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the comment was created.
    pub fn when(&self) -> &Timestamp {
        &self.when
    }

    /// Path under which the comment is addressed.
    pub fn location(&self) -> String {
        format!("/comments/{}", self.id)
    }

    /// Orders comments newest first, ties broken by descending id.
    pub fn newest_first(a: &Comment, b: &Comment) -> std::cmp::Ordering {
        b.when.cmp(&a.when).then_with(|| b.id.cmp(&a.id))
    }
}
