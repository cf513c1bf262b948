//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file, if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: GatewayConfig,
    /// `None` when no `DATABASE_URL` is set; messages are then kept in memory
    pub database: Option<DatabaseConfig>,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// WebSocket gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Interval advertised to clients in the Hello frame
    pub heartbeat_interval: Duration,
    /// Silence after which a connection is considered dead
    pub heartbeat_timeout: Duration,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}

impl GatewayConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_GATEWAY_PORT,
            heartbeat_interval: Duration::from_millis(DEFAULT_HEARTBEAT_INTERVAL_MS),
            heartbeat_timeout: Duration::from_millis(DEFAULT_HEARTBEAT_TIMEOUT_MS),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

const DEFAULT_GATEWAY_PORT: u16 = 8080;
const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 45_000;
const DEFAULT_HEARTBEAT_TIMEOUT_MS: u64 = 90_000;
const DEFAULT_OUTBOUND_BUFFER: usize = 100;

// Default value functions
fn default_app_name() -> String {
    "chat-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections())?,
            }),
            None => None,
        };

        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        let outbound_buffer = parse_or(&lookup, "GATEWAY_OUTBOUND_BUFFER", DEFAULT_OUTBOUND_BUFFER)?;
        if outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_OUTBOUND_BUFFER",
                "must be greater than zero".to_string(),
            ));
        }

        let heartbeat_interval_ms = parse_or(
            &lookup,
            "GATEWAY_HEARTBEAT_INTERVAL_MS",
            DEFAULT_HEARTBEAT_INTERVAL_MS,
        )?;
        if heartbeat_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_HEARTBEAT_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            gateway: GatewayConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "GATEWAY_PORT", DEFAULT_GATEWAY_PORT)?,
                heartbeat_interval: Duration::from_millis(heartbeat_interval_ms),
                heartbeat_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "GATEWAY_HEARTBEAT_TIMEOUT_MS",
                    DEFAULT_HEARTBEAT_TIMEOUT_MS,
                )?),
                outbound_buffer,
            },
            database,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
