// Tracing log adapter - Structured logging setup using tracing-subscriber

use tracing_subscriber::EnvFilter;

use crate::domain::config::{LogLevel, LoggingConfig};
use crate::domain::errors::*;

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, DomainError> {
    let level = LogLevel::parse(&config.level)?;
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str())))
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// command output. A second call is a no-op.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), DomainError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Ignore "already set": tests and embedders may have installed one
    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            json: false,
        };
        assert!(build_filter(&config).is_err());
        assert!(init_tracing(&config).is_err());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig::default();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }
}
