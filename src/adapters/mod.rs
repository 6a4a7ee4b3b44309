//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum endpoint, request context and session scoping
//! - `postgres` - PostgreSQL session pool
//! - `memory` - In-memory session pool for tests and local runs

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::{app_router, with_middleware};
pub use memory::{InMemoryCommentStore, StoreStats};
pub use postgres::PostgresSessionPool;
