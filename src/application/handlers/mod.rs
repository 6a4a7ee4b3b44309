//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations against
//! a store session borrowed for the current request.

pub mod comment;

pub use comment::{
    CreateCommentCommand, CreateCommentHandler, ListCommentsHandler, ListCommentsQuery,
};
