//! Comment store ports.
//!
//! Two contracts split along the resource lifecycle:
//!
//! - `SessionPool` - the process-wide handle, created once at startup and
//!   shared read-only. It only hands out sessions.
//! - `StoreSession` - a borrowed connection, exclusively owned by one request.
//!   Dropping it releases the connection back to the pool.
//!
//! # Design
//!
//! Release is tied to `Drop`, so a session is returned exactly once on every
//! exit path, including panics and cancelled futures.

use async_trait::async_trait;

use crate::domain::comment::Comment;

/// Process-wide factory for store sessions.
#[async_trait]
pub trait SessionPool: Send + Sync {
    /// Borrow a session for the duration of one request.
    ///
    /// # Errors
    ///
    /// - `Unavailable` when the pool is exhausted or the store cannot be reached
    async fn acquire(&self) -> Result<Box<dyn StoreSession>, StoreError>;

    /// Tear the pool down at process exit.
    ///
    /// Outstanding sessions are still released normally.
    async fn close(&self) {}
}

/// A borrowed store connection.
#[async_trait]
pub trait StoreSession: Send {
    /// Insert one comment as a single write.
    ///
    /// # Errors
    ///
    /// - `Backend` when the store rejects the write
    async fn insert_comment(&mut self, comment: &Comment) -> Result<(), StoreError>;

    /// Fetch up to `limit` comments, newest first.
    ///
    /// Ties on `when` are broken by descending id.
    async fn recent_comments(&mut self, limit: usize) -> Result<Vec<Comment>, StoreError>;
}

/// Errors raised by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No session could be obtained.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store reported an error for an operation.
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }
}
