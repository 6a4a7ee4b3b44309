//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps, errors)
//! - `comment` - The comment entity and its error taxonomy

pub mod comment;
pub mod foundation;
