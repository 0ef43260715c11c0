//! MCP server implementation for research-mcp.
//!
//! This crate wires the paper search and lookup tools into rmcp tool handlers
//! and exposes stdio and streamable HTTP runners.

mod helpers;
mod tools;
pub mod server;

use research_core::catalog::PaperCatalog;
use research_core::control::ResearchTools;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

pub use tools::{PaperIdParams, TopicParams};

const SERVER_INSTRUCTIONS: &str = r"research-mcp searches arXiv and caches paper metadata per topic.

Workflow:
1. Call `search_papers` with a `topic`. Up to five matching papers are fetched from arXiv,
   cached under the topic, and their ids are returned in relevance order.
2. Call `extract_info` with a `paper_id` to read the cached title, authors, publication date,
   summary and PDF link. Any topic searched earlier can answer.
3. Use `list_topics` to see which topics have cached papers and `get_topic_papers` to read
   everything cached for one topic.

Notes:
- Topics are case-insensitive; spaces become underscores (`Quantum Computing` -> `quantum_computing`).
- Arguments may be plain strings, JSON text, one-element lists, or objects keyed by the
  parameter name.
- An unknown `paper_id` returns a message, not an error.
- `health` returns `ok`.";

/// MCP server wrapper around the research tool set.
pub struct ResearchMcp<K: PaperCatalog> {
    tool_router: ToolRouter<Self>,
    tools: ResearchTools<K>,
}

impl<K: PaperCatalog> Clone for ResearchMcp<K> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            tools: self.tools.clone(),
        }
    }
}

impl<K: PaperCatalog> ResearchMcp<K> {
    /// Creates a new server around an already-built tool set.
    #[must_use]
    pub fn new(tools: ResearchTools<K>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_papers()
            + Self::tool_router_topics()
            + Self::tool_router_context();
        Self { tool_router, tools }
    }

    pub(crate) const fn tools(&self) -> &ResearchTools<K> {
        &self.tools
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<K: PaperCatalog> ResearchMcp<K> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<K: PaperCatalog> ServerHandler for ResearchMcp<K> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::catalog::{CatalogEntry, CatalogQuery, CatalogResult};
    use research_core::control::ToolOptions;
    use research_core::store::JsonPaperStore;

    struct EmptyCatalog;

    impl PaperCatalog for EmptyCatalog {
        async fn search(&self, _query: &CatalogQuery) -> CatalogResult<Vec<CatalogEntry>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "empty"
        }
    }

    #[test]
    fn registers_every_tool() {
        let tools = ResearchTools::new(
            JsonPaperStore::new("unused"),
            EmptyCatalog,
            ToolOptions::default(),
        );
        let server = ResearchMcp::new(tools);
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "extract_info",
                "get_topic_papers",
                "health",
                "help",
                "list_topics",
                "search_papers",
            ]
        );
        assert!(server.get_info().instructions.is_some());
    }
}
