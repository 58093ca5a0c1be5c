#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use ouch_client::domain::WeatherSnapshot;
use ouch_service::{
    config::Coordinates,
    http::{router, AppState},
    recorder::OwieRecorder,
    weather::{WeatherError, WeatherSource},
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use time::macros::datetime;
use tower::ServiceExt;

pub const PORTLAND: Coordinates = Coordinates {
    latitude: 45.52,
    longitude: -122.68,
};

pub fn rainy_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        observed_at: datetime!(2024-11-02 14:30:00 UTC),
        temperature: 48.2,
        humidity: 81.0,
        pressure: 1004.0,
        uv_index: 1.3,
        precipitation: 0.4,
        condition_id: 500,
        condition: "Rain".to_string(),
        description: "light rain".to_string(),
    }
}

/// Weather source that replays a fixed script, then keeps returning `fallback`.
pub struct ScriptedWeather {
    script: Mutex<VecDeque<Result<WeatherSnapshot, WeatherError>>>,
    fallback: WeatherSnapshot,
    calls: AtomicUsize,
}

impl ScriptedWeather {
    pub fn always(snapshot: WeatherSnapshot) -> Arc<Self> {
        Self::scripted(Vec::new(), snapshot)
    }

    pub fn scripted(
        script: Vec<Result<WeatherSnapshot, WeatherError>>,
        fallback: WeatherSnapshot,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WeatherSource for ScriptedWeather {
    async fn current(&self, _at: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// A database in a fresh temp dir. Keep the `TempDir` alive for the test.
pub async fn temp_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = ouch_client::db::open_pool(&dir.path().join("data").join("data.db"))
        .await
        .unwrap();
    (dir, pool)
}

pub fn build_app(weather: Arc<dyn WeatherSource>, pool: SqlitePool) -> Router {
    let recorder = OwieRecorder::new(weather, pool, PORTLAND);
    router(AppState {
        recorder: Arc::new(recorder),
    })
}

pub async fn post(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
