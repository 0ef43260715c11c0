use clap::{Parser, builder::BoolishValueParser};
use research_core::args::ArgumentConvention;
use research_core::catalog::arxiv::DEFAULT_ARXIV_API_URL;
use research_mcp::server::DEFAULT_MCP_HTTP_ADDR;
use research_store::schema::{DEFAULT_MAX_RESULTS, DEFAULT_PAPERS_DIR};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 30;
const MAX_RESULTS_LIMIT: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "research-mcpd", version, about = "Research paper MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "RESEARCH_PAPERS_DIR", default_value = DEFAULT_PAPERS_DIR)]
    papers_dir: PathBuf,

    #[arg(long, env = "RESEARCH_MAX_RESULTS", default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    #[arg(long, env = "RESEARCH_CATALOG_URL", default_value = DEFAULT_ARXIV_API_URL)]
    catalog_url: String,

    #[arg(
        long,
        env = "RESEARCH_CATALOG_TIMEOUT_SECS",
        default_value_t = DEFAULT_CATALOG_TIMEOUT_SECS
    )]
    catalog_timeout_secs: u64,

    #[arg(long, env = "RESEARCH_ARGUMENT_CONVENTION", default_value = "lenient")]
    argument_convention: String,

    #[arg(
        long = "stdio",
        env = "RESEARCH_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "RESEARCH_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "RESEARCH_MCP_HTTP_ADDR", default_value_t = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    pub papers_dir: PathBuf,
    pub max_results: usize,
    pub catalog_url: String,
    pub catalog_timeout: Duration,
    pub argument_convention: ArgumentConvention,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl ResearchConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for ResearchConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.papers_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "RESEARCH_PAPERS_DIR",
                value: String::new(),
            });
        }

        if args.max_results == 0 || args.max_results > MAX_RESULTS_LIMIT {
            return Err(ConfigError::InvalidSetting {
                name: "RESEARCH_MAX_RESULTS",
                value: args.max_results.to_string(),
            });
        }

        let catalog_url = args.catalog_url.trim().to_string();
        if catalog_url.is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "RESEARCH_CATALOG_URL",
                value: args.catalog_url,
            });
        }

        if args.catalog_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "RESEARCH_CATALOG_TIMEOUT_SECS",
                value: args.catalog_timeout_secs.to_string(),
            });
        }

        let argument_convention = args
            .argument_convention
            .parse::<ArgumentConvention>()
            .map_err(|_| ConfigError::InvalidSetting {
                name: "RESEARCH_ARGUMENT_CONVENTION",
                value: args.argument_convention.clone(),
            })?;

        Ok(Self {
            papers_dir: args.papers_dir,
            max_results: args.max_results,
            catalog_url,
            catalog_timeout: Duration::from_secs(args.catalog_timeout_secs),
            argument_convention,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            papers_dir: PathBuf::from(DEFAULT_PAPERS_DIR),
            max_results: DEFAULT_MAX_RESULTS,
            catalog_url: DEFAULT_ARXIV_API_URL.to_string(),
            catalog_timeout_secs: DEFAULT_CATALOG_TIMEOUT_SECS,
            argument_convention: "lenient".to_string(),
            enable_stdio: false,
            mcp_serve: true,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR,
        }
    }

    #[test]
    fn defaults_parse() {
        let config = ResearchConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.max_results, 5);
        assert_eq!(config.papers_dir, PathBuf::from("papers"));
        assert_eq!(config.argument_convention, ArgumentConvention::Lenient);
        assert_eq!(config.catalog_timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_zero_max_results() {
        let mut args = base_args();
        args.max_results = 0;

        let err = ResearchConfig::try_from(args).expect_err("zero results is invalid");
        assert!(err.to_string().contains("RESEARCH_MAX_RESULTS"));
    }

    #[test]
    fn parses_argument_convention() {
        let mut args = base_args();
        args.argument_convention = "Structured".to_string();
        let config = ResearchConfig::try_from(args).expect("config should parse");
        assert_eq!(config.argument_convention, ArgumentConvention::Structured);

        let mut args = base_args();
        args.argument_convention = "loose".to_string();
        assert!(ResearchConfig::try_from(args).is_err());
    }

    #[test]
    fn cli_flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "research-mcpd",
            "--papers-dir",
            "/tmp/papers",
            "--max-results",
            "3",
            "--stdio",
            "true",
        ])
        .expect("flags should parse");
        let config = ResearchConfig::try_from(args).expect("config should parse");

        assert_eq!(config.papers_dir, PathBuf::from("/tmp/papers"));
        assert_eq!(config.max_results, 3);
        assert!(config.enable_stdio);
        assert_eq!(config.mcp_http_addr.to_string(), "127.0.0.1:4030");
    }
}
