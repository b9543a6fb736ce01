use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pager_core::{ListMode, QueryKey};
use pager_engine::EndpointSettings;
use pager_logging::{pager_info, LogDestination};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "pager.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error(transparent)]
    Args(#[from] pico_args::Error),
    #[error("unexpected arguments: {0}")]
    UnexpectedArgs(String),
}

/// Settings read from the RON config file. Every field has a default, so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub language: Option<String>,
    /// Environment variable holding the bearer token, if the API needs one.
    pub token_env: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Collection opened at startup when `--path` is not given.
    pub default_path: String,
    /// Collection used by the `search` command.
    pub search_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let endpoint = EndpointSettings::default();
        Self {
            base_url: endpoint.base_url,
            language: Some("ko-KR".to_string()),
            token_env: Some("TMDB_TOKEN".to_string()),
            connect_timeout_secs: endpoint.connect_timeout.as_secs(),
            request_timeout_secs: endpoint.request_timeout.as_secs(),
            default_path: "movie/popular".to_string(),
            search_path: "search/movie".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the config at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                pager_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        pager_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn endpoint_settings(&self) -> EndpointSettings {
        EndpointSettings {
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn search_key(&self, term: &str) -> QueryKey {
        QueryKey::new(self.search_path.clone()).with_search(term)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub config: PathBuf,
    pub path: Option<String>,
    pub search: Option<String>,
    pub mode: ListMode,
    pub log: LogDestination,
    pub log_file: PathBuf,
}

impl CliArgs {
    pub fn parse(mut args: pico_args::Arguments) -> Result<Self, ConfigError> {
        let parsed = Self {
            config: args
                .opt_value_from_str("--config")?
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME)),
            path: args.opt_value_from_str("--path")?,
            search: args.opt_value_from_str("--search")?,
            mode: if args.contains("--accumulate") {
                ListMode::Accumulate
            } else {
                ListMode::Replace
            },
            log: args.opt_value_from_str("--log")?.unwrap_or_default(),
            log_file: args
                .opt_value_from_str("--log-file")?
                .unwrap_or_else(|| PathBuf::from("./pager.log")),
        };

        let rest = args.finish();
        if !rest.is_empty() {
            let rest: Vec<String> = rest
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            return Err(ConfigError::UnexpectedArgs(rest.join(" ")));
        }
        Ok(parsed)
    }

    /// The query opened at startup.
    pub fn initial_key(&self, config: &AppConfig) -> QueryKey {
        match (&self.search, &self.path) {
            (Some(term), None) => config.search_key(term),
            (search, path) => {
                let key = QueryKey::new(path.clone().unwrap_or_else(|| config.default_path.clone()));
                match search {
                    Some(term) => key.with_search(term.as_str()),
                    None => key,
                }
            }
        }
    }
}
