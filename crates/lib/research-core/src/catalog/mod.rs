//! Paper catalog clients.
//!
//! A catalog turns a free-text query into a relevance-ordered list of paper
//! entries. Ranking is entirely the catalog's concern; callers never re-sort.

pub mod arxiv;

use std::{error::Error, fmt, future::Future};

use chrono::{DateTime, SecondsFormat, Utc};
use research_store::models::PaperRecord;

pub use arxiv::{ArxivCatalog, ArxivCatalogConfig, parse_atom_feed};

/// A bounded, relevance-ranked catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub query: String,
    pub max_results: usize,
}

impl CatalogQuery {
    #[must_use]
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
        }
    }
}

/// A single search hit as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub short_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: DateTime<Utc>,
    pub summary: String,
    pub pdf_url: String,
}

impl CatalogEntry {
    /// Normalizes the entry into a cacheable record.
    #[must_use]
    pub fn into_record(self) -> PaperRecord {
        PaperRecord {
            paper_id: self.short_id,
            title: self.title,
            authors: self.authors,
            published: self.published.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            summary: self.summary,
            pdf_url: self.pdf_url,
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Request(String),
    Status { status: u16, url: String },
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(message) => write!(f, "catalog request failed: {message}"),
            Self::Status { status, url } => {
                write!(f, "catalog returned HTTP {status} for {url}")
            }
            Self::Parse(message) => write!(f, "catalog response could not be parsed: {message}"),
        }
    }
}

impl Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<roxmltree::Error> for CatalogError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// External paper search service.
pub trait PaperCatalog: Send + Sync + 'static {
    /// Runs a search and returns at most `query.max_results` entries in the
    /// catalog's own ranking order.
    fn search(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = CatalogResult<Vec<CatalogEntry>>> + Send;

    /// Human-readable catalog name for logging.
    fn name(&self) -> &str;
}
