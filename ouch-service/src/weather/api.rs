use ouch_client::domain::WeatherSnapshot;
use serde::Deserialize;
use time::OffsetDateTime;

use super::WeatherError;

/// The subset of a One Call 3.0 response this service depends on.
///
/// Every field except precipitation is required; serde rejects payloads
/// that lack one.
#[derive(Debug, Deserialize)]
pub struct OneCallResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
pub struct CurrentConditions {
    pub dt: i64,
    pub temp: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub uvi: f64,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub snow: Option<Precipitation>,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h", default)]
    pub last_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
}

impl OneCallResponse {
    pub fn parse(body: &str) -> Result<Self, WeatherError> {
        serde_json::from_str(body).map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }

    pub fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let current = self.current;

        let condition = current
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::InvalidResponse("current.weather is empty".to_string()))?;

        let observed_at = OffsetDateTime::from_unix_timestamp(current.dt).map_err(|e| {
            WeatherError::InvalidResponse(format!("current.dt {} out of range: {e}", current.dt))
        })?;

        // Rain takes precedence; snow is only consulted when no rain fell.
        let precipitation = current
            .rain
            .and_then(|p| p.last_hour)
            .filter(|mm| *mm > 0.0)
            .or_else(|| current.snow.and_then(|p| p.last_hour))
            .unwrap_or(0.0);

        Ok(WeatherSnapshot {
            observed_at,
            temperature: current.temp,
            humidity: current.humidity,
            pressure: current.pressure,
            uv_index: current.uvi,
            precipitation,
            condition_id: condition.id,
            condition: condition.main,
            description: condition.description,
        })
    }
}
