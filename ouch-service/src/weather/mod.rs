//! Current-conditions lookup against the OpenWeather One Call API.

pub mod api;
pub mod client;
pub mod retry;

use ouch_client::domain::WeatherSnapshot;

use crate::config::Coordinates;

pub use client::WeatherClient;
pub use retry::RetryPolicy;

#[derive(thiserror::Error, Debug)]
pub enum WeatherError {
    /// Every attempt failed with a network error or a non-success status.
    #[error("weather unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },
    /// The upstream answered but the payload does not match the expected schema.
    #[error("invalid response from weather API: {0}")]
    InvalidResponse(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Anything that can produce a weather snapshot for a location.
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError>;
}
