use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::geocode::nominatim::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};
use crate::indicators::FetchSettings;
use crate::report::gemini::DEFAULT_MODEL;

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
    pub report_model: ReportModelConfig,
    pub indicators: IndicatorServiceConfig,
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let report_model = ReportModelConfig {
            api_key: non_empty_var("GEMINI_API_KEY"),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_secs: parse_var("GEMINI_TIMEOUT_SECS", 60)?,
        };

        let indicators = IndicatorServiceConfig {
            base_url: non_empty_var("INDICATOR_SERVICE_URL"),
            timeout_secs: parse_var("INDICATOR_TIMEOUT_SECS", 30)?,
            fire_lookback_years: parse_var("FIRE_LOOKBACK_YEARS", 5)?,
            simplified_temperature: parse_flag("SIMPLIFIED_TEMPERATURE")?,
        };

        let geocoder = GeocoderConfig {
            base_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_URL.to_string()),
            user_agent: env::var("NOMINATIM_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            timeout_secs: parse_var("NOMINATIM_TIMEOUT_SECS", 10)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                allowed_origins,
            },
            telemetry: TelemetryConfig { log_level },
            report_model,
            indicators,
            geocoder,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var: name }),
        None => Ok(default),
    }
}

fn parse_flag(name: &'static str) -> Result<bool, ConfigError> {
    match non_empty_var(name).map(|raw| raw.to_ascii_lowercase()) {
        None => Ok(false),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { var: name }),
        },
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS. Empty allows any origin.
    pub allowed_origins: Vec<String>,
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

/// Generative model used for the multi-hazard narrative.
#[derive(Clone)]
pub struct ReportModelConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl ReportModelConfig {
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for ReportModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportModelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Remote indicator service. Without a base URL the wildfire score comes
/// from the report model alone.
#[derive(Debug, Clone)]
pub struct IndicatorServiceConfig {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub fire_lookback_years: u8,
    pub simplified_temperature: bool,
}

impl IndicatorServiceConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            per_fetch_timeout: Duration::from_secs(self.timeout_secs),
            fire_lookback_years: self.fire_lookback_years,
            simplified_temperature: self.simplified_temperature,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str },
    InvalidFlag { var: &'static str },
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative integer")
            }
            ConfigError::InvalidFlag { var } => {
                write!(f, "{var} must be true/false, yes/no, on/off or 1/0")
            }
            ConfigError::MissingApiKey => write!(
                f,
                "GEMINI_API_KEY not set; add it to your .env file or environment"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. }
            | ConfigError::MissingApiKey => None,
        }
    }
}
