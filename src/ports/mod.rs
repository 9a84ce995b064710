// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media metadata probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total playback length of the media file in milliseconds
    async fn probe_duration_ms(&self, file_path: &Path) -> Result<u64, DomainError>;
}

/// Port for launching the external transcoding engine
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Start the engine with an already tokenized argument list
    async fn launch(&self, arguments: &[String]) -> Result<Box<dyn TranscodeProcess>, DomainError>;
}

/// A running engine invocation
#[async_trait]
pub trait TranscodeProcess: Send {
    /// Next line of engine output, `None` once the stream is closed
    async fn next_line(&mut self) -> Result<Option<String>, DomainError>;

    /// Ask the engine to stop
    async fn terminate(&mut self) -> Result<(), DomainError>;

    /// Wait for exit and classify it
    async fn wait(&mut self) -> Result<EngineResult, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Copy file, returning the number of bytes copied
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Delete file; a missing file is not an error
    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Check write permissions for directory
    async fn can_write_to_directory(&self, dir_path: &Path) -> Result<bool, DomainError>;
}

/// Port for handing finished media to an external player
#[async_trait]
pub trait PlayerPort: Send + Sync {
    async fn present(&self, media_path: &Path) -> Result<(), DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Load configuration from an explicit file or the default search path
    async fn load_config(&self, file_path: Option<&Path>) -> Result<AppConfig, DomainError>;
}
