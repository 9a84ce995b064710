// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// File not found
    FileNotFound(String),
    /// Insufficient permissions
    PermissionDenied(String),
    /// Media duration could not be resolved
    ProbeFailed(String),
    /// A job already occupies the runner slot
    AlreadyRunning(String),
    /// The external process could not be started
    LaunchFailed(String),
    /// Processing error
    ProcessingError(String),
    /// File system operation failed
    FsFail(String),
    /// Invalid or unreadable configuration
    ConfigError(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            DomainError::ProbeFailed(msg) => write!(f, "Duration probe failed: {}", msg),
            DomainError::AlreadyRunning(msg) => write!(f, "Already running: {}", msg),
            DomainError::LaunchFailed(msg) => write!(f, "Launch failed: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
