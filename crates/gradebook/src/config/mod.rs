use crate::roster::ScorePolicy;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("GRADEBOOK_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("GRADEBOOK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("GRADEBOOK_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("GRADEBOOK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let score_policy = parse_score_policy(
            &env::var("GRADEBOOK_SCORE_POLICY").unwrap_or_else(|_| "strict".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pipeline: PipelineConfig { score_policy },
        })
    }
}

fn parse_score_policy(value: &str) -> Result<ScorePolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(ScorePolicy::Strict),
        "zero" | "zero_on_error" | "zero-on-error" => Ok(ScorePolicy::ZeroOnError),
        _ => Err(ConfigError::InvalidScorePolicy {
            value: value.to_string(),
        }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Pipeline-wide defaults that individual runs may override.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub score_policy: ScorePolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScorePolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "GRADEBOOK_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "GRADEBOOK_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScorePolicy { value } => {
                write!(
                    f,
                    "GRADEBOOK_SCORE_POLICY '{}' is not one of: strict, zero_on_error",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidScorePolicy { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
