//! Error handling module for CropX

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for CropX operations
#[derive(Error, Debug)]
pub enum CropError {
    /// Input file not found and no asset to materialize it from
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Write access to the output location is missing
    #[error("Write access denied for {path}; grant it before starting a crop")]
    PermissionDenied { path: String },

    /// Media probe error
    #[error("Failed to probe media duration: {message}")]
    ProbeError { message: String },

    /// Single-slot rejection
    #[error("A transcode job is already running")]
    AlreadyRunning,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Any other domain failure
    #[error(transparent)]
    Domain(DomainError),
}

impl From<DomainError> for CropError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::ProbeFailed(message) => CropError::ProbeError { message },
            DomainError::AlreadyRunning(_) => CropError::AlreadyRunning,
            DomainError::PermissionDenied(path) => CropError::PermissionDenied { path },
            DomainError::FileNotFound(path) => CropError::InputFileNotFound { path },
            DomainError::ConfigError(message) => CropError::ConfigError { message },
            other => CropError::Domain(other),
        }
    }
}

/// Result type alias for CropX operations
pub type CropResult<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_specific_variants() {
        assert!(matches!(
            CropError::from(DomainError::ProbeFailed("corrupt".into())),
            CropError::ProbeError { .. }
        ));
        assert!(matches!(
            CropError::from(DomainError::AlreadyRunning("job 1".into())),
            CropError::AlreadyRunning
        ));
        assert!(matches!(
            CropError::from(DomainError::LaunchFailed("no ffmpeg".into())),
            CropError::Domain(DomainError::LaunchFailed(_))
        ));
    }

    #[test]
    fn test_messages() {
        let err = CropError::from(DomainError::ProbeFailed("unsupported container".into()));
        assert_eq!(
            err.to_string(),
            "Failed to probe media duration: unsupported container"
        );
        let err = CropError::from(DomainError::InternalError("lock".into()));
        assert_eq!(err.to_string(), "Internal error: lock");
    }
}
