use std::sync::Arc;

use anyhow::{Context, Result};
use ouch_service::{
    config::AppConfig,
    http::{self, AppState},
    metrics_server, observability,
    recorder::OwieRecorder,
    weather::WeatherClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Fail before binding anything if required settings are absent.
    let cfg = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        e
    })?;
    tracing::info!(
        db_path = %cfg.db_path.display(),
        lat = cfg.weather.location.latitude,
        lon = cfg.weather.location.longitude,
        "configuration loaded"
    );

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(metrics_cfg.bind_addr).await?;
    }

    let pool = ouch_client::db::open_pool(&cfg.db_path)
        .await
        .with_context(|| format!("failed to open database at {}", cfg.db_path.display()))?;

    let weather = WeatherClient::new(&cfg.weather)?;
    let recorder = OwieRecorder::new(Arc::new(weather), pool.clone(), cfg.weather.location);
    let app = http::router(AppState {
        recorder: Arc::new(recorder),
    });

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cfg.server.host, cfg.server.port))?;
    tracing::info!(addr = %listener.local_addr()?, "starting server");

    http::serve(listener, app).await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}
