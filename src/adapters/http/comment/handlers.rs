//! HTTP handlers for the comments endpoint.
//!
//! A single handler serves `/comments` and dispatches on method. It expects
//! to run under [`SessionScope`](crate::adapters::http::middleware::SessionScope),
//! which provides the store session through the request context.

use axum::body::to_bytes;
use axum::extract::Request;
use axum::handler::Handler;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::adapters::http::middleware::{boxed, BoxHandler, DbSession};
use crate::application::handlers::comment::{
    CreateCommentHandler, ListCommentsHandler, ListCommentsQuery,
};
use crate::domain::comment::CommentError;

use super::dto::{CommentResponse, CreateCommentRequest};

/// Largest request body accepted by `POST /comments`.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// The comments handler as a type-erased service, ready for adapters.
pub fn comments_handler() -> BoxHandler {
    boxed(handle_comments.with_state(()))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// `/comments` - GET lists, POST creates, anything else is 405.
pub async fn handle_comments(request: Request) -> Response {
    let method = request.method().clone();
    match method {
        Method::GET => list_comments(request).await,
        Method::POST => create_comment(request).await,
        other => {
            tracing::debug!(method = %other, "Unsupported method on /comments");
            (StatusCode::METHOD_NOT_ALLOWED, "Not supported").into_response()
        }
    }
}

/// POST /comments - Decode, stamp, insert, then redirect to the new comment.
async fn create_comment(request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let session = match DbSession::from_extensions(&parts.extensions) {
        Ok(session) => session,
        Err(rejection) => return rejection.into_response(),
    };

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return handle_comment_error(CommentError::decode(e.to_string())),
    };
    let req: CreateCommentRequest = match serde_json::from_slice(&bytes) {
        Ok(req) => req,
        Err(e) => return handle_comment_error(CommentError::decode(e.to_string())),
    };

    let mut lease = match session.lease().await {
        Ok(lease) => lease,
        Err(rejection) => return rejection.into_response(),
    };

    match CreateCommentHandler::new()
        .handle(&mut **lease, req.into())
        .await
    {
        Ok(comment) => Redirect::temporary(&comment.location()).into_response(),
        Err(e) => handle_comment_error(e),
    }
}

/// GET /comments - The newest comments as a JSON array.
async fn list_comments(request: Request) -> Response {
    let session = match DbSession::from_extensions(request.extensions()) {
        Ok(session) => session,
        Err(rejection) => return rejection.into_response(),
    };

    let comments = {
        let mut lease = match session.lease().await {
            Ok(lease) => lease,
            Err(rejection) => return rejection.into_response(),
        };
        match ListCommentsHandler::new()
            .handle(&mut **lease, ListCommentsQuery::recent())
            .await
        {
            Ok(comments) => comments,
            Err(e) => return handle_comment_error(e),
        }
    };

    let body: Vec<CommentResponse> = comments.iter().map(CommentResponse::from).collect();
    match serde_json::to_vec(&body) {
        Ok(json) => ([(CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => handle_comment_error(CommentError::serialization(e.to_string())),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

/// Plain-text error response carrying the underlying message.
fn handle_comment_error(error: CommentError) -> Response {
    let status = if error.is_client_fault() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, error.to_string()).into_response()
}
