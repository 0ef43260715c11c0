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

/// Parameters naming a topic.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TopicParams {
    #[serde(default)]
    pub topic: Value,
}

#[tool_router(router = tool_router_topics, vis = "pub")]
impl<K: PaperCatalog> ResearchMcp<K> {
    #[tool(description = "List topics that have cached papers.")]
    async fn list_topics(&self) -> Result<CallToolResult, ErrorData> {
        let topics = self
            .tools()
            .lookup()
            .topics()
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(topics)?]))
    }

    #[tool(description = "Return every cached paper for a topic.")]
    async fn get_topic_papers(
        &self,
        Parameters(params): Parameters<TopicParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let papers = self
            .tools()
            .lookup()
            .topic_papers(&params.topic)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::text(papers)]))
    }
}
