use std::time::{Duration, Instant};

use ouch_client::domain::WeatherSnapshot;
use reqwest::StatusCode;
use tracing::{error, info, instrument, warn};

use super::{api::OneCallResponse, retry::RetryPolicy, WeatherError, WeatherSource};
use crate::config::{Coordinates, WeatherConfig};

const ONE_CALL_PATH: &str = "/data/3.0/onecall";
const EXCLUDE: &str = "minutely,hourly,daily,alerts";
const UNITS: &str = "imperial";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a single failed attempt.
enum AttemptError {
    /// Network failure or non-success status; worth another try.
    Transient(String),
    /// The upstream answered with something unusable; retrying won't help.
    Rejected(WeatherError),
}

/// HTTP client for current conditions, with bounded retries.
pub struct WeatherClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WeatherError::Client)?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), ONE_CALL_PATH),
            api_key: config.api_key.clone(),
            retry: config.retry.clone(),
        })
    }

    #[instrument(skip(self), fields(lat = at.latitude, lon = at.longitude))]
    pub async fn fetch_current(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        let started = Instant::now();
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt: u32 = 0;

        let result = loop {
            attempt += 1;
            metrics::counter!("weather_fetch_attempts_total").increment(1);

            match self.fetch_once(at).await {
                Ok(snapshot) => {
                    if attempt > 1 {
                        info!(attempt, "weather fetch succeeded after retrying");
                    }
                    break Ok(snapshot);
                }
                Err(AttemptError::Rejected(e)) => {
                    error!(error = %e, attempt, "weather payload rejected, not retrying");
                    break Err(e);
                }
                Err(AttemptError::Transient(reason)) if attempt < max_attempts => {
                    let sleep_for = self.retry.delay_after(attempt);
                    warn!(
                        error = %reason,
                        attempt,
                        max_attempts,
                        delay_ms = sleep_for.as_millis() as u64,
                        "weather fetch failed, retrying with backoff"
                    );
                    tokio::time::sleep(sleep_for).await;
                }
                Err(AttemptError::Transient(reason)) => {
                    error!(error = %reason, attempt, "weather fetch failed, giving up");
                    break Err(WeatherError::Unavailable {
                        attempts: attempt,
                        last_error: reason,
                    });
                }
            }
        };

        metrics::histogram!("weather_fetch_latency_seconds")
            .record(started.elapsed().as_secs_f64());
        if result.is_err() {
            metrics::counter!("weather_fetch_failures_total").increment(1);
        }
        result
    }

    async fn fetch_once(&self, at: Coordinates) -> Result<WeatherSnapshot, AttemptError> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        // without_url() keeps the appid query parameter out of error text.
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("exclude", EXCLUDE),
            ])
            .send()
            .await
            .map_err(|e| AttemptError::Transient(e.without_url().to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AttemptError::Transient(
                    "rate limited by weather API (429 Too Many Requests)".to_string(),
                ));
            }
            status => {
                return Err(AttemptError::Transient(format!(
                    "weather API returned {status}"
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(e.without_url().to_string()))?;

        OneCallResponse::parse(&body)
            .and_then(OneCallResponse::into_snapshot)
            .map_err(AttemptError::Rejected)
    }
}

#[async_trait::async_trait]
impl WeatherSource for WeatherClient {
    async fn current(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(at).await
    }
}
