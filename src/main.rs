use anyhow::Context;
use asset_owner_predictor::{
    api::{build_router, AppState},
    config::Config,
    ingest::UploadStore,
    ml::OwnerService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    init_tracing(&config);

    tracing::info!(
        "Starting {} v{}",
        config.observability.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = asset_owner_predictor::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Train on the startup dataset; the server does not start without a model
    tracing::info!(
        path = %config.dataset.startup_path.display(),
        "Training initial models"
    );
    let startup_config = config.clone();
    let service = tokio::task::spawn_blocking(move || OwnerService::bootstrap(&startup_config))
        .await
        .context("startup training task failed")?
        .with_context(|| {
            format!(
                "failed to train on startup dataset {}",
                config.dataset.startup_path.display()
            )
        })?;

    let app_state = AppState::new(
        Arc::new(service),
        UploadStore::new(config.dataset.upload_dir.clone()),
    )
    .with_max_upload_bytes(config.server.max_upload_bytes);

    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {}", http_addr))?;

    tracing::info!("HTTP server listening on http://{}", http_addr);
    tracing::info!("   Upload form: http://{}/", http_addr);
    tracing::info!("   Prediction API: http://{}/v1/predict", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "asset_owner_predictor={},tower_http={}",
            config.observability.log_level, config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
