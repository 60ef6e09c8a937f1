use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use crate::domain::sort::SortKey;

use super::config::SourceKind;
use super::constants::{
    ENV_API_COOKIE, ENV_API_TIMEOUT_SECS, ENV_API_URL, ENV_CONFIG, ENV_DATA_DIR, ENV_PAGE_SIZE,
    ENV_SOURCE,
};

#[derive(Parser)]
#[command(name = "cybsuite-table")]
#[command(version, about = "Filter, sort and page CybSuite entity records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Record source (file or api)
    #[arg(long, global = true, env = ENV_SOURCE, value_parser = parse_source_kind)]
    pub source: Option<SourceKind>,

    /// Directory holding `<entity>.json` and `<entity>.schema.json` files
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// CRUD API base URL
    #[arg(long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// API request timeout in seconds
    #[arg(long, global = true, env = ENV_API_TIMEOUT_SECS)]
    pub api_timeout: Option<u64>,

    /// Cookie header sent with API requests
    #[arg(long, global = true, env = ENV_API_COOKIE, hide_env_values = true)]
    pub api_cookie: Option<String>,

    /// Rows per page
    #[arg(long, global = true, env = ENV_PAGE_SIZE)]
    pub page_size: Option<usize>,
}

/// Parse record source kind from CLI/env string
fn parse_source_kind(s: &str) -> Result<SourceKind, String> {
    match s.to_lowercase().as_str() {
        "file" => Ok(SourceKind::File),
        "api" => Ok(SourceKind::Api),
        _ => Err(format!(
            "Invalid record source '{}'. Valid options: file, api",
            s
        )),
    }
}

/// Parse output format from CLI string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format '{}'. Valid options: table, json",
            s
        )),
    }
}

/// Parse a 1-based page number
fn parse_page(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(format!("Invalid page '{}'. Pages start at 1", s)),
    }
}

/// How query results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Filter selection shared by commands that pick records
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive search across every field
    #[arg(long, short = 's', conflicts_with_all = ["filter", "filter_file"])]
    pub search: Option<String>,

    /// Filter document: {"conditions": [...], "logic": "and" | "or"}
    #[arg(long, short = 'f', conflicts_with = "filter_file")]
    pub filter: Option<String>,

    /// Read the filter document from a file
    #[arg(long)]
    pub filter_file: Option<PathBuf>,
}

impl FilterArgs {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.filter.is_none() && self.filter_file.is_none()
    }
}

#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// Entity name (e.g. host, user, finding)
    pub entity: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Sort key as column[:asc|desc]; repeat for secondary keys
    #[arg(long, value_parser = SortKey::parse)]
    pub sort: Vec<SortKey>,

    /// Page number (1-based)
    #[arg(long, default_value = "1", value_parser = parse_page)]
    pub page: usize,

    /// Output format (table or json)
    #[arg(long, default_value = "table", value_parser = parse_output_format)]
    pub format: OutputFormat,

    /// Write every matching row (all pages) to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Filter, sort and page the records of an entity
    Query(QueryArgs),
    /// List the filter operators offered for each column of an entity
    Operators {
        /// Entity name
        entity: String,
    },
    /// Delete every record matching a search or filter. Requires confirmation.
    Delete {
        /// Entity name
        entity: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub source: Option<SourceKind>,
    pub data_dir: Option<PathBuf>,
    pub api_url: Option<String>,
    pub api_timeout: Option<u64>,
    pub api_cookie: Option<String>,
    pub page_size: Option<usize>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        source: cli.source,
        data_dir: cli.data_dir,
        api_url: cli.api_url,
        api_timeout: cli.api_timeout,
        api_cookie: cli.api_cookie,
        page_size: cli.page_size,
    };
    (config, cli.command)
}
