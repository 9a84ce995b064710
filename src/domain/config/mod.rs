// Application configuration - typed view of cropx.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::{CropRect, TranscodeProfile};

/// Complete application configuration. Every section falls back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub transcode: TranscodeProfile,
    pub crop: CropRect,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// Locations of the external binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub ffplay_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            ffplay_path: PathBuf::from("ffplay"),
        }
    }
}

/// Input, output and bundled asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Bundled sample copied to `input` on first use
    pub asset: Option<PathBuf>,
    pub input: PathBuf,
    /// Fixed output location, overwritten on every run
    pub output: PathBuf,
    /// Delete the output file when a job fails or is cancelled
    pub remove_partial_output: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            asset: None,
            input: PathBuf::from("cropx-input.mp4"),
            output: PathBuf::from("cropx-output.mp4"),
            remove_partial_output: false,
        }
    }
}

/// Logging configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::ConfigError(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl AppConfig {
    /// Validate configuration. Crop geometry is deliberately left unchecked.
    pub fn validate(&self) -> Result<(), DomainError> {
        LogLevel::parse(&self.logging.level)?;

        let binaries = [
            ("engine.ffmpeg_path", &self.engine.ffmpeg_path),
            ("engine.ffprobe_path", &self.engine.ffprobe_path),
            ("engine.ffplay_path", &self.engine.ffplay_path),
            ("paths.input", &self.paths.input),
            ("paths.output", &self.paths.output),
        ];
        for (key, path) in binaries {
            if path.as_os_str().is_empty() {
                return Err(DomainError::ConfigError(format!("{} cannot be empty", key)));
            }
        }

        self.transcode.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crop, CropRect::new(500, 500, 300, 100));
        assert_eq!(config.engine.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert!(config.paths.asset.is_none());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(matches!(config.validate(), Err(DomainError::ConfigError(_))));
    }

    #[test]
    fn test_empty_binary_path_rejected() {
        let mut config = AppConfig::default();
        config.engine.ffprobe_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_parse_is_case_insensitive() {
        assert_eq!(LogLevel::parse("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::parse("warn").unwrap().as_str(), "warn");
        assert!(LogLevel::parse("verbose").is_err());
    }
}
