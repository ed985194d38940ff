//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Output formats accepted by `observability.logging.format`.
pub const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Unknown output format.
    #[error("unknown log format '{0}' (expected json, pretty or compact)")]
    UnknownFormat(String),
    /// Invalid level or filter directive.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Build the filter: `RUST_LOG` when set, the configured level otherwise.
///
/// Chatty HTTP internals are held at `warn` either way.
#[allow(clippy::expect_used)]
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let base = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&config.level),
    }
    .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    Ok(base
        .add_directive(
            "hyper_util=warn"
                .parse()
                .expect("static directive 'hyper_util=warn' is valid"),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .expect("static directive 'reqwest=warn' is valid"),
        ))
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        other => return Err(LoggingError::UnknownFormat(other.to_string())),
    };
    result.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_format() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        let Err(err) = init_tracing(&config) else {
            panic!("expected unknown format error");
        };
        assert!(matches!(err, LoggingError::UnknownFormat(_)));
    }

    #[test]
    fn builds_filter_from_level() {
        let config = LoggingConfig {
            level: "put_screener=debug,info".to_string(),
            ..LoggingConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
