use std::sync::Arc;

use research_store::schema::{is_valid_topic_key, make_topic_key};
use serde_json::Value;
use tracing::{info, warn};

use crate::args::ArgumentConvention;
use crate::catalog::{CatalogEntry, CatalogQuery, PaperCatalog};
use crate::store::JsonPaperStore;

use super::{ToolError, ToolOptions, run_blocking};

pub const TOPIC_ARG: &str = "topic";

/// Searches the catalog for a topic and caches the hits in the topic's partition.
pub struct SearchTool<K: PaperCatalog> {
    store: Arc<JsonPaperStore>,
    catalog: Arc<K>,
    convention: ArgumentConvention,
    max_results: usize,
}

impl<K: PaperCatalog> Clone for SearchTool<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            catalog: self.catalog.clone(),
            convention: self.convention,
            max_results: self.max_results,
        }
    }
}

impl<K: PaperCatalog> SearchTool<K> {
    #[must_use]
    pub const fn new(store: Arc<JsonPaperStore>, catalog: Arc<K>, options: ToolOptions) -> Self {
        Self {
            store,
            catalog,
            convention: options.convention,
            max_results: options.max_results,
        }
    }

    /// Searches for `payload`'s topic and returns the hit ids in catalog order.
    ///
    /// The returned ids describe this search only; the partition may hold
    /// more papers from earlier searches. An unrecognized payload yields an
    /// empty list without touching the catalog or the store.
    ///
    /// # Errors
    /// Returns `ToolError::Catalog` if the catalog query fails, or
    /// `ToolError::Store` if the partition cannot be written.
    pub async fn search(&self, payload: &Value) -> Result<Vec<String>, ToolError> {
        let topic = match self.convention.normalize(payload, TOPIC_ARG) {
            Ok(topic) => topic,
            Err(err) => {
                warn!(error = %err, "search_papers called with invalid topic");
                return Ok(Vec::new());
            }
        };
        self.search_topic(&topic).await
    }

    /// Searches for an already-normalized topic.
    ///
    /// # Errors
    /// See [`SearchTool::search`].
    pub async fn search_topic(&self, topic: &str) -> Result<Vec<String>, ToolError> {
        let topic_key = make_topic_key(topic);
        if !is_valid_topic_key(&topic_key) {
            warn!(topic, "search_papers topic does not map to a partition");
            return Ok(Vec::new());
        }

        let query = CatalogQuery::new(topic, self.max_results);
        let mut entries = self.catalog.search(&query).await?;
        entries.truncate(self.max_results);

        let paper_ids: Vec<String> = entries.iter().map(|entry| entry.short_id.clone()).collect();
        let records: Vec<_> = entries.into_iter().map(CatalogEntry::into_record).collect();

        let store = self.store.clone();
        let key = topic_key.clone();
        let index = run_blocking(move || store.merge(&key, records)).await?;

        info!(
            catalog = self.catalog.name(),
            topic_key = %topic_key,
            hits = paper_ids.len(),
            cached = index.len(),
            "search_papers stored results"
        );
        Ok(paper_ids)
    }
}
