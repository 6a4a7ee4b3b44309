//! Per-request store sessions.
//!
//! [`SessionScope`] is an [`Adapter`] that checks one session out of the
//! [`SessionPool`] for every request, attaches it to the request context for
//! the inner handler, and gives it back when the request is finished.
//!
//! ```text
//! Request → scope_session → pool.acquire() → context::set(session)
//!                                               ↓
//!                            handler → DbSession extractor → lease().await
//!                                               ↓
//!           response ← scope guard dropped → session released
//! ```
//!
//! The session is released exactly once per request on every path: normal
//! return, an error response, a panic in the handler, or the request future
//! being dropped mid-flight.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{Extensions, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use tower::Layer;

use super::adapter::{boxed, Adapter, BoxHandler};
use super::context::{self, ContextError, Lease, Scoped};
use crate::ports::{SessionPool, StoreSession};

/// Session pool shared by every request.
pub type SessionPoolState = Arc<dyn SessionPool>;

/// The value `scope_session` stores in the request context.
pub type ScopedSession = Box<dyn StoreSession>;

/// Adapter that scopes one store session to each request.
#[derive(Clone)]
pub struct SessionScope {
    pool: SessionPoolState,
}

impl SessionScope {
    pub fn new(pool: SessionPoolState) -> Self {
        Self { pool }
    }
}

impl Adapter for SessionScope {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        boxed(from_fn_with_state(self.pool.clone(), scope_session).layer(next))
    }
}

/// Acquires a session, runs the rest of the chain with it, releases it.
///
/// If no session can be acquired the request ends here with a 500 and the
/// inner handler is never called.
pub async fn scope_session(
    State(pool): State<SessionPoolState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match pool.acquire().await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to acquire store session");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    tracing::debug!("Store session acquired");

    let scope = context::set::<ScopedSession>(request.extensions_mut(), session);
    let response = next.run(request).await;
    drop(scope);

    tracing::debug!(status = %response.status(), "Store session released");
    response
}

/// Extractor for the request's store session.
///
/// Rejects with 500 when the handler is not running under [`SessionScope`].
pub struct DbSession(Scoped<ScopedSession>);

impl DbSession {
    /// Reads the session handle from request extensions.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRejection`] if no session was attached.
    pub fn from_extensions(extensions: &Extensions) -> Result<Self, SessionRejection> {
        context::get::<ScopedSession>(extensions)
            .map(DbSession)
            .map_err(SessionRejection::from)
    }

    /// Exclusive access to the session for the duration of the lease.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRejection::Expired`] once the request has finished.
    pub async fn lease(&self) -> Result<Lease<ScopedSession>, SessionRejection> {
        self.0.lease().await.map_err(SessionRejection::from)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for DbSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_extensions(&parts.extensions)
    }
}

/// Rejection when no usable session is in the request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    Missing,
    Expired,
}

impl From<ContextError> for SessionRejection {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Missing(_) => Self::Missing,
            ContextError::Expired(_) => Self::Expired,
        }
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let message = match self {
            SessionRejection::Missing => "missing database session",
            SessionRejection::Expired => "database session expired",
        };
        tracing::error!(reason = message, "Handler ran without a store session");
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
