//! Axum router configuration for the comments endpoint.

use axum::Router;

use crate::adapters::http::middleware::{adapt, SessionPoolState, SessionScope};

use super::handlers::comments_handler;

/// Create the comments router.
///
/// # Routes
/// - `GET /comments` - List the newest comments
/// - `POST /comments` - Create a comment, 307 to its location
///
/// Every request gets its own store session from `pool`. Other methods are
/// answered with 405 by the handler itself, so the whole path is mounted as
/// one service.
pub fn comment_routes(pool: SessionPoolState) -> Router {
    let scope = SessionScope::new(pool);
    let handler = adapt(comments_handler(), &[&scope]);

    Router::new().route_service("/comments", handler)
}
