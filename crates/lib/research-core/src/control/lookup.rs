use std::sync::Arc;

use research_store::schema::{is_valid_topic_key, make_topic_key};
use serde_json::Value;
use tracing::{debug, warn};

use crate::args::ArgumentConvention;
use crate::store::{JsonPaperStore, StoreError};

use super::search::TOPIC_ARG;
use super::{ToolError, run_blocking};

pub const PAPER_ID_ARG: &str = "paper_id";

/// Message returned when no partition holds the requested paper.
#[must_use]
pub fn not_found_message(paper_id: &str) -> String {
    format!("There is no saved information for paper ID: {paper_id}")
}

/// Message returned when a topic has no cached papers.
#[must_use]
pub fn no_topic_message(topic: &str) -> String {
    format!("No papers found for topic: {topic}")
}

/// Resolves cached paper metadata by id across every topic partition.
#[derive(Clone)]
pub struct LookupTool {
    store: Arc<JsonPaperStore>,
    convention: ArgumentConvention,
}

impl LookupTool {
    #[must_use]
    pub const fn new(store: Arc<JsonPaperStore>, convention: ArgumentConvention) -> Self {
        Self { store, convention }
    }

    /// Returns the cached record for `payload`'s paper id as pretty JSON.
    ///
    /// A missing paper, or a payload that names no paper, yields the
    /// not-found message rather than an error.
    ///
    /// # Errors
    /// Returns `ToolError::Store` if the store root cannot be listed.
    pub async fn lookup(&self, payload: &Value) -> Result<String, ToolError> {
        let paper_id = match self.convention.normalize(payload, PAPER_ID_ARG) {
            Ok(paper_id) => paper_id,
            Err(err) => {
                warn!(error = %err, "extract_info called with invalid paper id");
                return Ok(not_found_message(&payload_text(payload)));
            }
        };
        self.lookup_id(&paper_id).await
    }

    /// Looks up an already-normalized paper id.
    ///
    /// # Errors
    /// See [`LookupTool::lookup`].
    pub async fn lookup_id(&self, paper_id: &str) -> Result<String, ToolError> {
        let store = self.store.clone();
        let id = paper_id.to_string();
        let found = run_blocking(move || store.find(&id)).await?;

        match found {
            Some(record) => {
                debug!(paper_id, "extract_info hit");
                Ok(record.to_pretty_json().map_err(StoreError::Encode)?)
            }
            None => Ok(not_found_message(paper_id)),
        }
    }

    /// Returns every cached paper for a topic as pretty JSON.
    ///
    /// # Errors
    /// Returns `ToolError::Store` if the partition cannot be encoded.
    pub async fn topic_papers(&self, payload: &Value) -> Result<String, ToolError> {
        let topic = match self.convention.normalize(payload, TOPIC_ARG) {
            Ok(topic) => topic,
            Err(err) => {
                warn!(error = %err, "get_topic_papers called with invalid topic");
                return Ok(no_topic_message(&payload_text(payload)));
            }
        };
        let topic_key = make_topic_key(&topic);
        if !is_valid_topic_key(&topic_key) {
            return Ok(no_topic_message(&topic));
        }

        let store = self.store.clone();
        let index = run_blocking(move || Ok(store.load_or_empty(&topic_key))).await?;
        if index.is_empty() {
            return Ok(no_topic_message(&topic));
        }
        Ok(serde_json::to_string_pretty(&index).map_err(StoreError::Encode)?)
    }

    /// Lists topic partitions that hold cached papers.
    ///
    /// # Errors
    /// Returns `ToolError::Store` if the store root cannot be listed.
    pub async fn topics(&self) -> Result<Vec<String>, ToolError> {
        let store = self.store.clone();
        run_blocking(move || store.list_topics()).await
    }
}

fn payload_text(payload: &Value) -> String {
    payload
        .as_str()
        .map_or_else(|| payload.to_string(), str::to_string)
}
