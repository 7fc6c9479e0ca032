use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Value shipped in templates before a real intake endpoint is provisioned.
pub const PLACEHOLDER_INTAKE_ENDPOINT: &str = "https://eoxql7i6ccoq9vb.m.pipedream.net";

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
    pub intake: IntakeConfig,
    pub sessions: SessionConfig,
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

        let endpoint = IntakeEndpoint::from_setting(env::var("LEAD_INTAKE_ENDPOINT").ok());
        let request_timeout = seconds_var("LEAD_INTAKE_TIMEOUT_SECS", 10)?;
        let status_reset = seconds_var("LEAD_STATUS_RESET_SECS", 5)?;
        let download_dir = env::var("BROCHURE_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let idle_timeout = seconds_var("LEAD_SESSION_IDLE_SECS", 1_800)?;
        let max_open = env::var("LEAD_MAX_SESSIONS")
            .unwrap_or_else(|_| "10000".to_string())
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|count| *count > 0)
            .ok_or(ConfigError::InvalidCount {
                variable: "LEAD_MAX_SESSIONS",
            })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake: IntakeConfig {
                endpoint,
                request_timeout,
                status_reset,
                download_dir,
            },
            sessions: SessionConfig {
                idle_timeout,
                max_open,
            },
        })
    }
}

fn seconds_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidSeconds { variable: name }),
        Err(_) => Ok(Duration::from_secs(default)),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where leads are sent and how form sessions pace themselves.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub endpoint: IntakeEndpoint,
    pub request_timeout: Duration,
    /// Delay before a succeeded/failed session falls back to idle.
    pub status_reset: Duration,
    pub download_dir: PathBuf,
}

/// Limits on server-held form sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions untouched for this long are closed and forgotten.
    pub idle_timeout: Duration,
    pub max_open: usize,
}

/// Intake endpoint as resolved from settings.
///
/// An unset, blank or placeholder value resolves to `Unconfigured`, which makes
/// form sessions fail fast without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEndpoint {
    Configured(String),
    Unconfigured,
}

impl IntakeEndpoint {
    pub fn from_setting(value: Option<String>) -> Self {
        match value {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed == PLACEHOLDER_INTAKE_ENDPOINT {
                    Self::Unconfigured
                } else {
                    Self::Configured(trimmed.to_string())
                }
            }
            None => Self::Unconfigured,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Configured(url) => Some(url),
            Self::Unconfigured => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeconds { variable: &'static str },
    InvalidCount { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeconds { variable } => {
                write!(f, "{variable} must be a whole number of seconds")
            }
            ConfigError::InvalidCount { variable } => {
                write!(f, "{variable} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidSeconds { .. }
            | ConfigError::InvalidCount { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
