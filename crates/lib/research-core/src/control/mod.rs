//! Tool set exposed to agent runtimes.
//!
//! Tools are constructed once with the store they operate on; nothing is
//! registered globally. Each tool call is a self-contained request/response.

use std::{error::Error, fmt, sync::Arc};

use research_store::schema::DEFAULT_MAX_RESULTS;

use crate::args::ArgumentConvention;
use crate::catalog::{CatalogError, PaperCatalog};
use crate::store::{JsonPaperStore, StoreError, StoreResult};

pub mod lookup;
pub mod search;

pub use lookup::{LookupTool, no_topic_message, not_found_message};
pub use search::SearchTool;

/// Failures that surface to the tool caller.
///
/// Malformed arguments and unreadable partitions never appear here; they
/// degrade to empty results inside the tools.
#[derive(Debug)]
pub enum ToolError {
    Catalog(CatalogError),
    Store(StoreError),
    Join(tokio::task::JoinError),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Join(err) => write!(f, "store task failed: {err}"),
        }
    }
}

impl Error for ToolError {}

impl From<CatalogError> for ToolError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<tokio::task::JoinError> for ToolError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err)
    }
}

/// Settings shared by every tool in a [`ResearchTools`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOptions {
    pub convention: ArgumentConvention,
    pub max_results: usize,
}

impl ToolOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            convention: ArgumentConvention::Lenient,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub const fn with_convention(mut self, convention: ArgumentConvention) -> Self {
        self.convention = convention;
        self
    }

    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The search and lookup tools, sharing one store instance.
pub struct ResearchTools<K: PaperCatalog> {
    search: SearchTool<K>,
    lookup: LookupTool,
}

impl<K: PaperCatalog> Clone for ResearchTools<K> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            lookup: self.lookup.clone(),
        }
    }
}

impl<K: PaperCatalog> ResearchTools<K> {
    #[must_use]
    pub fn new(store: JsonPaperStore, catalog: K, options: ToolOptions) -> Self {
        Self::from_arcs(Arc::new(store), Arc::new(catalog), options)
    }

    #[must_use]
    pub fn from_arcs(store: Arc<JsonPaperStore>, catalog: Arc<K>, options: ToolOptions) -> Self {
        Self {
            search: SearchTool::new(store.clone(), catalog, options),
            lookup: LookupTool::new(store, options.convention),
        }
    }

    #[must_use]
    pub const fn search(&self) -> &SearchTool<K> {
        &self.search
    }

    #[must_use]
    pub const fn lookup(&self) -> &LookupTool {
        &self.lookup
    }
}

/// Runs a store operation on the blocking pool.
async fn run_blocking<T, F>(op: F) -> Result<T, ToolError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(op).await??)
}
