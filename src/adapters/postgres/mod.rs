//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresSessionPool` - Wraps a `PgPool`; each request borrows one pooled connection
//! - `PostgresSession` - A checked-out connection, returned to the pool on drop

mod comment_store;

pub use comment_store::{PostgresSession, PostgresSessionPool};
