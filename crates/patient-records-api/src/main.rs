use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use patient_records_api::{api_router, cors_layer, AppState, Config};
use patient_records_core::db::seed_demo_data;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .init();

    tracing::info!("Patient records API starting v{}", env!("CARGO_PKG_VERSION"));

    let db = config
        .open_database()
        .with_context(|| format!("failed to open database {}", config.database.display()))?;

    if config.seed {
        let summary = seed_demo_data(&db).context("failed to seed demo data")?;
        tracing::info!(
            patients = summary.patients,
            encounters = summary.encounters,
            "Seed complete"
        );
    }

    let cors = cors_layer(&config.cors_origin)
        .with_context(|| format!("invalid CORS origin {:?}", config.cors_origin))?;
    let app = api_router(AppState::new(db)).layer(cors);

    let listener = TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.socket_addr()))?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Patient records API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
