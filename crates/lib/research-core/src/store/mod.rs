//! Store interfaces and the JSON partition implementation.
//!
//! The store layer persists one index file per topic partition and resolves
//! paper ids across every partition under its root.

pub mod json;

pub use json::{JsonPaperStore, StoreError, StoreResult};
