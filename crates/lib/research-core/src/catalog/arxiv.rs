use std::time::Duration;

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

use super::{CatalogEntry, CatalogError, CatalogQuery, CatalogResult, PaperCatalog};

pub const DEFAULT_ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";
const DEFAULT_USER_AGENT: &str = concat!("research-mcp/", env!("CARGO_PKG_VERSION"));
const ARXIV_PDF_BASE: &str = "https://arxiv.org/pdf/";

/// Connection settings for the arXiv Atom API.
#[derive(Debug, Clone)]
pub struct ArxivCatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ArxivCatalogConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ArxivCatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ARXIV_API_URL)
    }
}

/// Catalog backed by the public arXiv query API.
#[derive(Debug, Clone)]
pub struct ArxivCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivCatalog {
    /// Builds the HTTP client for the configured endpoint.
    ///
    /// # Errors
    /// Returns `CatalogError::Request` if the HTTP client cannot be built.
    pub fn new(config: ArxivCatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

impl PaperCatalog for ArxivCatalog {
    async fn search(&self, query: &CatalogQuery) -> CatalogResult<Vec<CatalogEntry>> {
        let max_results = query.max_results.to_string();
        debug!(query = %query.query, max_results = query.max_results, "querying arXiv");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", query.query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let mut entries = parse_atom_feed(&body)?;
        entries.truncate(query.max_results);
        Ok(entries)
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

/// Parses an arXiv Atom feed into catalog entries, preserving feed order.
///
/// Entries without an id or with an unparseable publication date are skipped.
///
/// # Errors
/// Returns `CatalogError::Parse` if the document is not XML or the feed
/// reports an API error.
pub fn parse_atom_feed(xml: &str) -> CatalogResult<Vec<CatalogEntry>> {
    let doc = Document::parse(xml)?;
    let mut entries = Vec::new();

    for entry in doc.descendants().filter(|node| node.has_tag_name("entry")) {
        let Some(raw_id) = child_text(entry, "id") else {
            continue;
        };
        if raw_id.contains("/api/errors") {
            let message = child_text(entry, "summary").unwrap_or_else(|| raw_id.clone());
            return Err(CatalogError::Parse(message));
        }

        let short_id = short_id(&raw_id);
        let published = child_text(entry, "published").and_then(|text| parse_timestamp(&text));
        let Some(published) = published else {
            warn!(paper_id = %short_id, "skipping entry without a valid published date");
            continue;
        };

        let authors = entry
            .children()
            .filter(|node| node.has_tag_name("author"))
            .filter_map(|author| child_text(author, "name"))
            .collect();

        let pdf_url = entry
            .children()
            .filter(|node| node.has_tag_name("link"))
            .find(|link| link.attribute("title") == Some("pdf"))
            .and_then(|link| link.attribute("href"))
            .map_or_else(|| format!("{ARXIV_PDF_BASE}{short_id}"), str::to_string);

        entries.push(CatalogEntry {
            title: child_text(entry, "title")
                .map(|title| collapse_whitespace(&title))
                .unwrap_or_default(),
            authors,
            published,
            summary: child_text(entry, "summary").unwrap_or_default(),
            pdf_url,
            short_id,
        });
    }

    Ok(entries)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn short_id(raw_id: &str) -> String {
    raw_id
        .split_once("/abs/")
        .map_or(raw_id, |(_, rest)| rest)
        .to_string()
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|value| value.with_timezone(&Utc))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title>ArXiv Query</title>
  <entry>
    <id>http://arxiv.org/abs/2401.12345v2</id>
    <published>2024-01-15T18:03:11Z</published>
    <title>Quantum Error
      Correction at Scale</title>
    <summary>  An abstract.  </summary>
    <author><name>John Doe</name></author>
    <author><name>Jane Smith</name><arxiv:affiliation>MIT</arxiv:affiliation></author>
    <link href="http://arxiv.org/abs/2401.12345v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2401.12345v2" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/quant-ph/0101001v1</id>
    <published>2001-01-01T00:00:00Z</published>
    <title>Old Paper</title>
    <summary>Old.</summary>
    <author><name>A. Author</name></author>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_in_feed_order() {
        let entries = parse_atom_feed(FEED).expect("feed should parse");
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.short_id, "2401.12345v2");
        assert_eq!(first.title, "Quantum Error Correction at Scale");
        assert_eq!(first.summary, "An abstract.");
        assert_eq!(first.authors, vec!["John Doe", "Jane Smith"]);
        assert_eq!(first.pdf_url, "http://arxiv.org/pdf/2401.12345v2");
        assert_eq!(first.published.to_rfc3339(), "2024-01-15T18:03:11+00:00");

        let second = &entries[1];
        assert_eq!(second.short_id, "quant-ph/0101001v1");
        assert_eq!(second.pdf_url, "https://arxiv.org/pdf/quant-ph/0101001v1");
    }

    #[test]
    fn empty_feed_has_no_entries() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        assert!(parse_atom_feed(xml).expect("feed should parse").is_empty());
    }

    #[test]
    fn api_error_entry_is_reported() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
  </entry>
</feed>"#;
        let err = parse_atom_feed(xml).expect_err("error entry should fail");
        assert!(err.to_string().contains("incorrect id format"));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        assert!(matches!(parse_atom_feed("<feed>"), Err(CatalogError::Parse(_))));
    }
}
