//! In-memory store adapter.
//!
//! Used by tests and for running the service without PostgreSQL.
//! Not suitable for production: data lives only as long as the process.

mod comment_store;

pub use comment_store::{InMemoryCommentStore, StoreStats};
