//! MCP tool modules.
//!
//! Tools are grouped by purpose: paper search and lookup, topic browsing,
//! and contextual help.

pub mod papers;
pub mod topics;
mod context;

pub use papers::PaperIdParams;
pub use topics::TopicParams;
