//! Core types and services for research-mcp.
//!
//! This crate owns the JSON-backed paper metadata store, the catalog client
//! used to search arXiv, and the tool set that ties the two together behind
//! argument-tolerant search and lookup operations.

pub mod args;
pub mod catalog;
pub mod control;
pub mod store;
