//! Comment domain module.
//!
//! A comment is a short note left by an author. Comments are created once,
//! never modified, and listed newest first.

mod aggregate;
mod errors;

pub use aggregate::{Comment, MAX_LISTED_COMMENTS};
pub use errors::CommentError;
