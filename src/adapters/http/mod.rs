//! HTTP adapters.
//!
//! - `middleware` - Request context, handler adapters and session scoping
//! - `comment` - The `/comments` endpoint
//! - `router` - Application router with tracing, timeouts and static files

pub mod comment;
pub mod middleware;
pub mod router;

pub use router::{app_router, with_middleware};
