// TOML config adapter - Configuration loading from TOML files and environment

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::config::AppConfig;
use crate::domain::errors::*;
use crate::ports::*;

/// Files searched, in order, when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["cropx.toml", "config/cropx.toml"];

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    search_paths: Vec<PathBuf>,
    env: EnvLookup,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter reading the process environment
    pub fn new() -> Self {
        Self {
            search_paths: DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect(),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the environment lookup
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Replace the default search path list
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Deserialize config from TOML string
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigError(format!("Failed to parse TOML config: {}", e)))
    }

    /// Serialize config to TOML string
    pub fn render(config: &AppConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `CROPX_*` environment overrides on top of `config`
    pub fn apply_env_overrides(&self, config: &mut AppConfig) -> usize {
        let mut applied = 0;
        let mut take = |key: &str| {
            let value = (self.env)(key).filter(|v| !v.trim().is_empty());
            if let Some(ref v) = value {
                info!("Found environment override: {} = {}", key, v);
                applied += 1;
            }
            value
        };

        if let Some(v) = take("CROPX_FFMPEG") {
            config.engine.ffmpeg_path = PathBuf::from(v);
        }
        if let Some(v) = take("CROPX_FFPROBE") {
            config.engine.ffprobe_path = PathBuf::from(v);
        }
        if let Some(v) = take("CROPX_FFPLAY") {
            config.engine.ffplay_path = PathBuf::from(v);
        }
        if let Some(v) = take("CROPX_DECODER") {
            config.transcode.decoder = v;
        }
        if let Some(v) = take("CROPX_ENCODER") {
            config.transcode.encoder = v;
        }
        if let Some(v) = take("CROPX_INPUT") {
            config.paths.input = PathBuf::from(v);
        }
        if let Some(v) = take("CROPX_OUTPUT") {
            config.paths.output = PathBuf::from(v);
        }
        if let Some(v) = take("CROPX_ASSET") {
            config.paths.asset = Some(PathBuf::from(v));
        }
        if let Some(v) = take("CROPX_LOG_LEVEL") {
            config.logging.level = v;
        }

        applied
    }

    async fn read_file(path: &Path) -> Result<AppConfig, DomainError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn load_config(&self, file_path: Option<&Path>) -> Result<AppConfig, DomainError> {
        let mut config = match file_path {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::read_file(path).await?
            }
            None => {
                let found = self.search_paths.iter().find(|p| p.is_file());
                match found {
                    Some(path) => {
                        info!("Loading configuration from: {}", path.display());
                        Self::read_file(path).await?
                    }
                    None => {
                        debug!("No configuration file found, using defaults");
                        AppConfig::default()
                    }
                }
            }
        };

        let overrides = self.apply_env_overrides(&mut config);
        if overrides > 0 {
            info!("Applied {} environment variable overrides", overrides);
        }
        Ok(config)
    }
}
