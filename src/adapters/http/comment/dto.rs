//! HTTP DTOs for the comments endpoint.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::application::handlers::comment::CreateCommentCommand;
use crate::domain::comment::Comment;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /comments`.
///
/// Missing fields default to empty strings. `id` and `when` may be present
/// but are ignored along with any other unknown field; the server assigns
/// both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub text: String,
}

impl From<CreateCommentRequest> for CreateCommentCommand {
    fn from(req: CreateCommentRequest) -> Self {
        Self {
            author: req.author,
            text: req.text,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One element of the `GET /comments` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    /// 24 lowercase hex characters.
    pub id: String,
    pub author: String,
    pub text: String,
    /// RFC 3339, UTC.
    pub when: String,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().to_hex(),
            author: comment.author().to_string(),
            text: comment.text().to_string(),
            when: comment
                .when()
                .as_datetime()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}
