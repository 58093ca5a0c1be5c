use time::OffsetDateTime;

use super::WeatherSnapshot;

/// A row of `owie_logs` as stored.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OwieLog {
    pub id: i64,
    pub body_part: String,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub logged_at: OffsetDateTime,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub observed_at: OffsetDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub uv_index: f64,
    pub precipitation: f64,
    pub weather_id: i64,
    pub weather_main: String,
    pub weather_description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl OwieLog {
    /// The weather half of the record.
    pub fn weather(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            observed_at: self.observed_at,
            temperature: self.temperature,
            humidity: self.humidity,
            pressure: self.pressure,
            uv_index: self.uv_index,
            precipitation: self.precipitation,
            condition_id: self.weather_id,
            condition: self.weather_main.clone(),
            description: self.weather_description.clone(),
        }
    }
}

/// An owie paired with the weather fetched for it, not yet persisted.
///
/// The weather snapshot is owned, never optional: a record cannot be built
/// without a complete snapshot.
#[derive(Debug, Clone)]
pub struct NewOwieLog {
    pub body_part: String,
    pub logged_at: OffsetDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: WeatherSnapshot,
}

impl NewOwieLog {
    /// The stored form of this record once SQLite has assigned `id`.
    pub fn into_stored(self, id: i64) -> OwieLog {
        let w = self.weather;
        OwieLog {
            id,
            body_part: self.body_part,
            logged_at: self.logged_at,
            observed_at: w.observed_at,
            temperature: w.temperature,
            humidity: w.humidity,
            pressure: w.pressure,
            uv_index: w.uv_index,
            precipitation: w.precipitation,
            weather_id: w.condition_id,
            weather_main: w.condition,
            weather_description: w.description,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
