use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{recorder::RecordError, weather::WeatherError};

/// Handler error; every variant renders as a JSON body with `saved: false`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Record(err) = self;

        let (status, code, message) = match &err {
            RecordError::InvalidBodyPart(e) => {
                (StatusCode::BAD_REQUEST, "INVALID_BODY_PART", e.to_string())
            }
            RecordError::Weather(WeatherError::InvalidResponse(detail)) => {
                tracing::error!(error = %detail, "weather payload did not match schema");
                (
                    StatusCode::BAD_GATEWAY,
                    "WEATHER_INVALID_RESPONSE",
                    "Weather API returned an unexpected response; owie was not saved".to_string(),
                )
            }
            RecordError::Weather(e) => {
                tracing::error!(error = %e, "weather unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "WEATHER_UNAVAILABLE",
                    "Weather data is unavailable; owie was not saved".to_string(),
                )
            }
            RecordError::Storage(e) => {
                tracing::error!(error = %e, "failed to store owie");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to store owie; owie was not saved".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
            "saved": false,
        });

        (status, Json(body)).into_response()
    }
}
