use std::sync::Arc;

use ouch_client::{
    db::owie_log_queries::insert_owie_log,
    domain::{NewOwieLog, OwieLog},
    StorageError,
};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    config::Coordinates,
    validation::{validate_body_part, ValidationError},
    weather::{WeatherError, WeatherSource},
};

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    InvalidBodyPart(#[from] ValidationError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Pairs each owie with the weather at the configured location and stores it.
///
/// A row is written only after a complete snapshot is in hand, in a single
/// insert, so a failed request leaves storage untouched.
pub struct OwieRecorder {
    weather: Arc<dyn WeatherSource>,
    pool: SqlitePool,
    location: Coordinates,
}

impl OwieRecorder {
    pub fn new(weather: Arc<dyn WeatherSource>, pool: SqlitePool, location: Coordinates) -> Self {
        Self {
            weather,
            pool,
            location,
        }
    }

    #[instrument(skip(self))]
    pub async fn record(&self, raw_body_part: &str) -> Result<OwieLog, RecordError> {
        let body_part = validate_body_part(raw_body_part).inspect_err(|_| {
            metrics::counter!("validation_body_part_rejected_total").increment(1);
        })?;

        let weather = self.weather.current(self.location).await?;

        let new_log = NewOwieLog {
            body_part,
            logged_at: OffsetDateTime::now_utc(),
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            weather,
        };
        let id = insert_owie_log(&self.pool, &new_log).await?;

        info!(
            id,
            body_part = %new_log.body_part,
            temperature = new_log.weather.temperature,
            pressure = new_log.weather.pressure,
            "owie logged"
        );
        Ok(new_log.into_stored(id))
    }
}
