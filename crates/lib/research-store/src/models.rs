use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata for a single paper as cached in a topic partition.
///
/// `paper_id` is the key of the partition map on disk and is not repeated in
/// the serialized body; the store re-attaches it after decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaperRecord {
    #[serde(skip)]
    pub paper_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub pdf_url: String,
}

impl PaperRecord {
    /// Renders the record body as 2-space indented JSON.
    ///
    /// # Errors
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Contents of one topic partition, keyed by paper id.
pub type PaperIndex = BTreeMap<String, PaperRecord>;

/// Restores the `paper_id` of each record from its map key.
pub fn attach_ids(index: &mut PaperIndex) {
    for (paper_id, record) in index.iter_mut() {
        record.paper_id.clone_from(paper_id);
    }
}
