//! Comment command and query handlers.

mod create_comment;
mod list_comments;

pub use create_comment::{CreateCommentCommand, CreateCommentHandler};
pub use list_comments::{ListCommentsHandler, ListCommentsQuery};
