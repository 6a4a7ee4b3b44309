//! Comment Service - a small comments API over a pooled store.
//!
//! Each HTTP request borrows one store session from a shared pool. The
//! session travels to the handler through a typed request context and is
//! returned to the pool when the request ends, however it ends.
//!
//! Layout follows ports and adapters:
//! - `domain` - Comment, identifiers, timestamps
//! - `ports` - Session pool and session traits
//! - `application` - Create and list use cases
//! - `adapters` - HTTP (axum), PostgreSQL (sqlx), in-memory store
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
