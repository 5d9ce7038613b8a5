use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Filter { value: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { value, .. } => {
                write!(
                    f,
                    "GRADEBOOK_LOG_LEVEL '{}' is not a valid tracing filter",
                    value
                )
            }
            TelemetryError::Init(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

fn filter_from_config(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        value: config.log_level.clone(),
        source,
    })
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// the configured `GRADEBOOK_LOG_LEVEL`; production output is compact
/// with ANSI and per-event targets disabled, development keeps both.
pub fn init(
    environment: AppEnvironment,
    config: &TelemetryConfig,
) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_from_config(config)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).compact();
    match environment {
        AppEnvironment::Production => builder.with_ansi(false).with_target(false).try_init(),
        AppEnvironment::Development | AppEnvironment::Test => builder.try_init(),
    }
    .map_err(TelemetryError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn accepts_standard_levels_and_directives() {
        assert!(filter_from_config(&config("info")).is_ok());
        assert!(filter_from_config(&config("gradebook=debug,tower=warn")).is_ok());
    }

    #[test]
    fn rejects_a_malformed_filter_and_names_the_value() {
        let err = filter_from_config(&config("no=such=filter")).expect_err("filter rejected");
        assert!(err.to_string().contains("no=such=filter"));
        assert!(err.to_string().contains("GRADEBOOK_LOG_LEVEL"));
    }
}
