use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use ouch_client::domain::OwieLog;
use serde::Serialize;
use serde_json::{json, Value};

use super::{error::ApiError, AppState};
use crate::{recorder::RecordError, validation::ValidationError};

#[derive(Debug, Serialize)]
pub struct OwieLogged {
    pub message: &'static str,
    pub owie: OwieLog,
}

pub async fn home() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

pub async fn log_owie(
    State(state): State<AppState>,
    body_part: Result<Path<String>, PathRejection>,
) -> Result<(StatusCode, Json<OwieLogged>), ApiError> {
    metrics::counter!("owie_requests_total").increment(1);

    let Path(body_part) = body_part.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable body part in path");
        reject(ValidationError::UndecodableBodyPart)
    })?;

    match state.recorder.record(&body_part).await {
        Ok(owie) => {
            metrics::counter!("owie_logged_total").increment(1);
            Ok((
                StatusCode::CREATED,
                Json(OwieLogged {
                    message: "Logged owie details successfully",
                    owie,
                }),
            ))
        }
        Err(e) => {
            metrics::counter!("owie_failed_total").increment(1);
            Err(e.into())
        }
    }
}

/// `POST /owie/` and `POST /owie` carry no body part at all.
pub async fn missing_body_part() -> ApiError {
    metrics::counter!("owie_requests_total").increment(1);
    reject(ValidationError::EmptyBodyPart)
}

fn reject(e: ValidationError) -> ApiError {
    metrics::counter!("validation_body_part_rejected_total").increment(1);
    metrics::counter!("owie_failed_total").increment(1);
    RecordError::from(e).into()
}
