use research_core::catalog::PaperCatalog;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ResearchMcp, helpers};

use super::TopicParams;

/// Parameters for resolving a cached paper.
///
/// `paper_id` is normalized by the configured argument convention, so it may
/// arrive as a string, JSON text, a one-element list or an object.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PaperIdParams {
    #[serde(default)]
    pub paper_id: Value,
}

#[tool_router(router = tool_router_papers, vis = "pub")]
impl<K: PaperCatalog> ResearchMcp<K> {
    #[tool(description = "Search arXiv for papers on a topic, cache their metadata under the topic, and return up to five paper ids in relevance order.")]
    async fn search_papers(
        &self,
        Parameters(params): Parameters<TopicParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let paper_ids = self
            .tools()
            .search()
            .search(&params.topic)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(paper_ids)?]))
    }

    #[tool(description = "Return the cached metadata for a paper id from any previously searched topic.")]
    async fn extract_info(
        &self,
        Parameters(params): Parameters<PaperIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let info = self
            .tools()
            .lookup()
            .lookup(&params.paper_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::text(info)]))
    }
}
