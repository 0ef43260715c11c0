//! Daemon entry point for the research MCP server.
//!
//! Loads configuration from CLI arguments and the environment, builds the
//! paper store and arXiv catalog, and serves the MCP protocol over stdio or
//! streamable HTTP.

mod config;
mod telemetry;

use research_core::catalog::{ArxivCatalog, ArxivCatalogConfig};
use research_core::control::{ResearchTools, ToolOptions};
use research_core::store::JsonPaperStore;
use research_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;

use crate::config::ResearchConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ResearchConfig::from_args()?;
    telemetry::init_tracing()?;

    let store = JsonPaperStore::new(&config.papers_dir);
    let catalog = ArxivCatalog::new(
        ArxivCatalogConfig::new(&config.catalog_url).with_timeout(config.catalog_timeout),
    )?;
    let options = ToolOptions::new()
        .with_convention(config.argument_convention)
        .with_max_results(config.max_results);
    let tools = ResearchTools::new(store, catalog, options);

    info!(
        papers_dir = %config.papers_dir.display(),
        convention = %config.argument_convention,
        max_results = config.max_results,
        "research-mcpd starting"
    );

    if config.enable_stdio {
        serve_stdio(tools).await
    } else if config.mcp_serve {
        serve_streamable_http(tools, McpHttpServerConfig::new(config.mcp_http_addr)).await
    } else {
        info!("no transport enabled, exiting");
        Ok(())
    }
}
