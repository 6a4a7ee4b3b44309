//! Comment-specific error types.

use thiserror::Error;

/// Errors raised while creating or listing comments.
///
/// Each variant carries the underlying message verbatim; it is what the
/// client receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    /// Request payload could not be decoded.
    #[error("{0}")]
    Decode(String),

    /// The store rejected the insert.
    #[error("{0}")]
    WriteFailed(String),

    /// The store failed to answer the listing query.
    #[error("{0}")]
    ReadFailed(String),

    /// Listing could not be serialized.
    #[error("{0}")]
    Serialization(String),
}

impl CommentError {
    pub fn decode(message: impl Into<String>) -> Self {
        CommentError::Decode(message.into())
    }
    pub fn write_failed(message: impl Into<String>) -> Self {
        CommentError::WriteFailed(message.into())
    }
    pub fn read_failed(message: impl Into<String>) -> Self {
        CommentError::ReadFailed(message.into())
    }
    pub fn serialization(message: impl Into<String>) -> Self {
        CommentError::Serialization(message.into())
    }

    /// True when the client is at fault.
    ///
    /// Insert failures count as client faults, matching the HTTP contract.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, CommentError::Decode(_) | CommentError::WriteFailed(_))
    }
}
