//! Paper metadata models and on-disk layout helpers for research-mcp.
//!
//! This crate defines the record shape persisted in each topic partition and
//! the naming rules that map a free-text topic onto a partition directory.

pub mod models;
pub mod schema;

pub use models::*;
