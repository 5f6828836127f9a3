use std::sync::Arc;

use courier_orders::engine::format::DisplayFormat;
use courier_orders::engine::ingest::{apply_snapshot, read_snapshot_file};
use courier_orders::{api, config, error, state};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let display = DisplayFormat::from_offset_minutes(config.display_utc_offset_minutes);
    let shared_state = Arc::new(state::AppState::new(display));

    if let Some(path) = &config.snapshot_file {
        let documents = read_snapshot_file(path).await?;
        let report = apply_snapshot(&shared_state, &documents);
        tracing::info!(
            path = %path.display(),
            revision = report.revision,
            accepted = report.accepted,
            "seed snapshot loaded"
        );
    }

    let app = api::rest::router(shared_state.clone());

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
