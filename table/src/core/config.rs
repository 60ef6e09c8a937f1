use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::table::DEFAULT_PAGE_SIZE;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DATA_DIR_NAME, DEFAULT_API_TIMEOUT_SECS, DEFAULT_API_URL,
};

// =============================================================================
// Record Source Enum
// =============================================================================

/// Where records and schemas come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON files in a data directory
    File,
    /// CRUD REST API
    #[default]
    Api,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Api => write!(f, "api"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Record source section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SourceFileConfig {
    pub kind: Option<SourceKind>,
    pub data_dir: Option<String>,
}

/// CRUD API section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ApiFileConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub cookie: Option<String>,
}

/// Table section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TableFileConfig {
    pub page_size: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub source: Option<SourceFileConfig>,
    pub api: Option<ApiFileConfig>,
    pub table: Option<TableFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(source) = other.source {
            let current = self.source.get_or_insert_with(SourceFileConfig::default);
            if source.kind.is_some() {
                tracing::trace!(kind = ?source.kind, "Merging source.kind");
                current.kind = source.kind;
            }
            if source.data_dir.is_some() {
                tracing::trace!(data_dir = ?source.data_dir, "Merging source.data_dir");
                current.data_dir = source.data_dir;
            }
        }

        if let Some(api) = other.api {
            let current = self.api.get_or_insert_with(ApiFileConfig::default);
            if api.url.is_some() {
                tracing::trace!(url = ?api.url, "Merging api.url");
                current.url = api.url;
            }
            if api.timeout_secs.is_some() {
                tracing::trace!(timeout_secs = ?api.timeout_secs, "Merging api.timeout_secs");
                current.timeout_secs = api.timeout_secs;
            }
            if api.cookie.is_some() {
                tracing::trace!("Merging api.cookie");
                current.cookie = api.cookie;
            }
        }

        if let Some(table) = other.table {
            let current = self.table.get_or_insert_with(TableFileConfig::default);
            if table.page_size.is_some() {
                tracing::trace!(page_size = ?table.page_size, "Merging table.page_size");
                current.page_size = table.page_size;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Record source configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub data_dir: PathBuf,
}

/// CRUD API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub cookie: Option<String>,
}

/// Table configuration
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub page_size: usize,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub api: ApiConfig,
    pub table: TableConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.cybsuite/cybsuite.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(file_config, cli)
    }

    /// Layer defaults, file config and CLI/env overrides
    fn from_layers(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_source = file_config.source.unwrap_or_default();
        let file_api = file_config.api.unwrap_or_default();
        let file_table = file_config.table.unwrap_or_default();

        let kind = cli.source.or(file_source.kind).unwrap_or_default();

        let data_dir = cli
            .data_dir
            .as_ref()
            .map(|p| expand_path(&p.to_string_lossy()))
            .or_else(|| file_source.data_dir.as_deref().map(expand_path))
            .unwrap_or_else(default_data_dir);

        let api = ApiConfig {
            url: cli
                .api_url
                .clone()
                .or(file_api.url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout_secs: cli
                .api_timeout
                .or(file_api.timeout_secs)
                .unwrap_or(DEFAULT_API_TIMEOUT_SECS),
            cookie: cli.api_cookie.clone().or(file_api.cookie),
        };

        let page_size = cli
            .page_size
            .or(file_table.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let config = Self {
            source: SourceConfig { kind, data_dir },
            api,
            table: TableConfig { page_size },
        };

        config.validate()?;

        tracing::debug!(
            source = %config.source.kind,
            data_dir = %config.source.data_dir.display(),
            api_url = %config.api.url,
            page_size = config.table.page_size,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.source.kind == SourceKind::Api {
            let url = self.api.url.trim();
            if url.is_empty() {
                anyhow::bail!("Configuration error: api.url must not be empty when source is 'api'");
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!(
                    "Configuration error: api.url must start with http:// or https://, got '{}'",
                    url
                );
            }
        }

        if self.api.timeout_secs == 0 {
            anyhow::bail!("Configuration error: api.timeout_secs must be greater than 0");
        }

        if self.table.page_size == 0 {
            anyhow::bail!("Configuration error: table.page_size must be greater than 0");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.cybsuite/cybsuite.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Default data directory (~/.cybsuite/data, or ./data without a home)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(APP_DOT_FOLDER).join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_kind_serde() {
        let kind: SourceKind = serde_json::from_str(r#""file""#).unwrap();
        assert_eq!(kind, SourceKind::File);
        let kind: SourceKind = serde_json::from_str(r#""api""#).unwrap();
        assert_eq!(kind, SourceKind::Api);
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::File.to_string(), "file");
        assert_eq!(SourceKind::Api.to_string(), "api");
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "source": { "kind": "file", "data_dir": "/srv/cybsuite" },
            "api": { "url": "http://backend:8000", "timeout_secs": 5, "cookie": "sessionid=abc" },
            "table": { "page_size": 25 }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let source = config.source.as_ref().unwrap();
        assert_eq!(source.kind, Some(SourceKind::File));
        assert_eq!(source.data_dir.as_deref(), Some("/srv/cybsuite"));
        let api = config.api.as_ref().unwrap();
        assert_eq!(api.url.as_deref(), Some("http://backend:8000"));
        assert_eq!(api.timeout_secs, Some(5));
        assert_eq!(api.cookie.as_deref(), Some("sessionid=abc"));
        assert_eq!(config.table.as_ref().unwrap().page_size, Some(25));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.source.is_none());
        assert!(config.api.is_none());
        assert!(config.table.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "table": { "page_size": 20 }, "tabel": {} }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert!(config.extra.get("tabel").is_some());
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            source: Some(SourceFileConfig {
                kind: Some(SourceKind::File),
                data_dir: Some("/base".to_string()),
            }),
            api: Some(ApiFileConfig {
                url: Some("http://base:8000".to_string()),
                timeout_secs: Some(10),
                cookie: None,
            }),
            ..FileConfig::default()
        };
        let overlay = FileConfig {
            source: Some(SourceFileConfig {
                kind: None,
                data_dir: Some("/overlay".to_string()),
            }),
            table: Some(TableFileConfig {
                page_size: Some(50),
            }),
            ..FileConfig::default()
        };
        base.merge(overlay);

        let source = base.source.as_ref().unwrap();
        assert_eq!(source.kind, Some(SourceKind::File));
        assert_eq!(source.data_dir.as_deref(), Some("/overlay"));
        assert_eq!(base.api.as_ref().unwrap().timeout_secs, Some(10));
        assert_eq!(base.table.as_ref().unwrap().page_size, Some(50));
    }

    #[test]
    fn test_layers_defaults() {
        let config = AppConfig::from_layers(FileConfig::default(), &CliConfig::default()).unwrap();
        assert_eq!(config.source.kind, SourceKind::Api);
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_API_TIMEOUT_SECS);
        assert!(config.api.cookie.is_none());
        assert_eq!(config.table.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_layers_cli_overrides_file() {
        let file_config: FileConfig = serde_json::from_str(
            r#"{ "source": { "kind": "api" }, "api": { "url": "http://file:8000" }, "table": { "page_size": 5 } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            source: Some(SourceKind::File),
            data_dir: Some(PathBuf::from("/tmp/records")),
            page_size: Some(15),
            ..CliConfig::default()
        };
        let config = AppConfig::from_layers(file_config, &cli).unwrap();
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.data_dir, PathBuf::from("/tmp/records"));
        assert_eq!(config.api.url, "http://file:8000");
        assert_eq!(config.table.page_size, 15);
    }

    #[test]
    fn test_validation_page_size_zero() {
        let cli = CliConfig {
            page_size: Some(0),
            ..CliConfig::default()
        };
        let result = AppConfig::from_layers(FileConfig::default(), &cli);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("table.page_size must be greater than 0")
        );
    }

    #[test]
    fn test_validation_timeout_zero() {
        let cli = CliConfig {
            api_timeout: Some(0),
            ..CliConfig::default()
        };
        let result = AppConfig::from_layers(FileConfig::default(), &cli);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api.timeout_secs must be greater than 0")
        );
    }

    #[test]
    fn test_validation_empty_api_url() {
        let cli = CliConfig {
            api_url: Some("  ".to_string()),
            ..CliConfig::default()
        };
        let result = AppConfig::from_layers(FileConfig::default(), &cli);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api.url must not be empty")
        );
    }

    #[test]
    fn test_validation_api_url_ignored_for_file_source() {
        let cli = CliConfig {
            source: Some(SourceKind::File),
            api_url: Some(String::new()),
            ..CliConfig::default()
        };
        assert!(AppConfig::from_layers(FileConfig::default(), &cli).is_ok());
    }

    #[test]
    fn test_validation_api_url_scheme() {
        let cli = CliConfig {
            api_url: Some("backend:8000".to_string()),
            ..CliConfig::default()
        };
        assert!(AppConfig::from_layers(FileConfig::default(), &cli).is_err());
    }

    #[test]
    fn test_load_explicit_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        fs::write(
            &path,
            r#"{ "source": { "kind": "file", "data_dir": "/data/records" }, "table": { "page_size": 30 } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            config: Some(path),
            ..CliConfig::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.data_dir, PathBuf::from("/data/records"));
        assert_eq!(config.table.page_size, 30);
    }

    #[test]
    fn test_load_missing_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/cybsuite.json")),
            ..CliConfig::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
