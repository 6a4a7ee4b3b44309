//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `SessionPool` - Process-wide factory handing out per-request sessions
//! - `StoreSession` - Exclusively owned connection used by one request

mod comment_store;

pub use comment_store::{SessionPool, StoreError, StoreSession};
