//! HTTP adapter for comments.
//!
//! - `GET /comments` - Newest comments first, at most 100
//! - `POST /comments` - Create a comment

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CommentResponse, CreateCommentRequest};
pub use handlers::{comments_handler, handle_comments, MAX_BODY_BYTES};
pub use routes::comment_routes;
