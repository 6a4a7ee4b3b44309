//! HTTP middleware for axum.
//!
//! - `adapter` - Composable handler adapters
//! - `context` - Typed request-scoped values
//! - `session` - Per-request store session scoping and its extractor

pub mod adapter;
pub mod context;
pub mod session;

pub use adapter::{adapt, boxed, Adapter, BoxHandler};
pub use context::{ContextError, Lease, ScopeGuard, Scoped};
pub use session::{
    scope_session, DbSession, ScopedSession, SessionPoolState, SessionRejection, SessionScope,
};
