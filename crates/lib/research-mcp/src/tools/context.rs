use research_core::catalog::PaperCatalog;
use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::ResearchMcp;

/// Payload listing the MCP commands.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List MCP commands exposed by this server.".to_string(),
                "search_papers - Search arXiv for a topic and cache up to five papers.".to_string(),
                "extract_info - Fetch cached metadata for a paper id.".to_string(),
                "list_topics - List topics with cached papers.".to_string(),
                "get_topic_papers - Fetch every cached paper for a topic.".to_string(),
                "health - Returns 'ok'.".to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl<K: PaperCatalog> ResearchMcp<K> {
    #[tool(description = "List the MCP commands exposed by this server.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
