use std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::weather::retry::RetryPolicy;

pub const API_KEY_VAR: &str = "OUCH_OW_API_KEY";
pub const LAT_VAR: &str = "OUCH_LAT";
pub const LON_VAR: &str = "OUCH_LON";
pub const DB_PATH_VAR: &str = "OUCH_DB_PATH";
pub const HOST_VAR: &str = "OUCH_HOST";
pub const PORT_VAR: &str = "OUCH_PORT";
pub const BASE_URL_VAR: &str = "OUCH_OW_BASE_URL";
pub const MAX_ATTEMPTS_VAR: &str = "OUCH_WEATHER_MAX_ATTEMPTS";
pub const RETRY_BASE_MS_VAR: &str = "OUCH_RETRY_BASE_MS";
pub const RETRY_JITTER_MS_VAR: &str = "OUCH_RETRY_JITTER_MS";
pub const RETRY_MAX_MS_VAR: &str = "OUCH_RETRY_MAX_MS";
pub const METRICS_ADDR_VAR: &str = "OUCH_METRICS_ADDR";

pub const DEFAULT_DB_PATH: &str = "data/data.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub location: Coordinates,
    pub retry: RetryPolicy,
}

// Keeps the API key out of logs.
impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("location", &self.location)
            .field("retry", &self.retry)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub weather: WeatherConfig,
    pub db_path: PathBuf,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present;
    /// variables already set in the environment take precedence over it.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Every missing required variable is reported at once. Blank values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (api_key, lat, lon) = match (get(API_KEY_VAR), get(LAT_VAR), get(LON_VAR)) {
            (Some(api_key), Some(lat), Some(lon)) => (api_key, lat, lon),
            (api_key, lat, lon) => {
                let missing = [
                    (API_KEY_VAR, api_key.is_none()),
                    (LAT_VAR, lat.is_none()),
                    (LON_VAR, lon.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                return Err(ConfigError::Missing(missing));
            }
        };

        let latitude: f64 = parse(LAT_VAR, &lat)?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid(LAT_VAR, "latitude must be within [-90, 90]"));
        }
        let longitude: f64 = parse(LON_VAR, &lon)?;
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid(LON_VAR, "longitude must be within [-180, 180]"));
        }

        let defaults = RetryPolicy::default();
        let max_attempts: u32 =
            parse_or(get(MAX_ATTEMPTS_VAR), MAX_ATTEMPTS_VAR, defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(invalid(MAX_ATTEMPTS_VAR, "at least one attempt is required"));
        }
        let base_ms: u64 = parse_or(
            get(RETRY_BASE_MS_VAR),
            RETRY_BASE_MS_VAR,
            defaults.base_delay.as_millis() as u64,
        )?;
        let jitter_ms: u64 = parse_or(
            get(RETRY_JITTER_MS_VAR),
            RETRY_JITTER_MS_VAR,
            defaults.jitter.as_millis() as u64,
        )?;
        let max_ms: u64 = parse_or(
            get(RETRY_MAX_MS_VAR),
            RETRY_MAX_MS_VAR,
            defaults.max_delay.as_millis() as u64,
        )?;
        if max_ms < base_ms {
            return Err(invalid(
                RETRY_MAX_MS_VAR,
                format!("maximum delay {max_ms}ms is below the base delay {base_ms}ms"),
            ));
        }

        let metrics = get(METRICS_ADDR_VAR)
            .map(|raw| parse::<SocketAddr>(METRICS_ADDR_VAR, &raw))
            .transpose()?
            .map(|bind_addr| MetricsConfig { bind_addr });

        Ok(Self {
            server: ServerConfig {
                host: get(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: parse_or(get(PORT_VAR), PORT_VAR, DEFAULT_PORT)?,
            },
            weather: WeatherConfig {
                api_key,
                base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                location: Coordinates { latitude, longitude },
                retry: RetryPolicy::new(max_attempts, base_ms, jitter_ms, max_ms),
            },
            db_path: get(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            metrics,
        })
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| invalid(key, format!("{raw:?}: {e}")))
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}
