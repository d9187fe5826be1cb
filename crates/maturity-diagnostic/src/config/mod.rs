use crate::workflows::diagnosis::scoring::{OptionWeightTable, WeightParseError, WeightViolation};
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
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let new_scope_weights = match env::var("DIAGNOSTIC_NEW_SCOPE_WEIGHTS") {
            Ok(raw) if !raw.trim().is_empty() => parse_new_scope_weights(&raw)?,
            _ => OptionWeightTable::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            scoring: ScoringConfig { new_scope_weights },
        })
    }
}

fn parse_new_scope_weights(raw: &str) -> Result<OptionWeightTable, ConfigError> {
    raw.parse().map_err(|err| ConfigError::InvalidWeights {
        value: raw.to_string(),
        source: match err {
            WeightParseError::NotAnInteger(_) => None,
            WeightParseError::Invalid(violation) => Some(violation),
        },
    })
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

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Scoring defaults applied by the administrative write paths.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Weight table stored for every newly created assessment scope.
    pub new_scope_weights: OptionWeightTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            new_scope_weights: OptionWeightTable::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidWeights {
        value: String,
        source: Option<WeightViolation>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeights { value, source } => match source {
                Some(reason) => write!(
                    f,
                    "DIAGNOSTIC_NEW_SCOPE_WEIGHTS '{value}' is not a usable weight table: {reason}"
                ),
                None => write!(
                    f,
                    "DIAGNOSTIC_NEW_SCOPE_WEIGHTS '{value}' must be a comma-separated list of integers"
                ),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeights { source, .. } => source
                .as_ref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
        }
    }
}
