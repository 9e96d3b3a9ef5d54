//! DİLMER backend binary.

use anyhow::{Context, Result};
use clap::Parser;
use dilmer_server::{ApiConfig, AppState, ServerArgs, create_router};
use services::AppServices;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("DİLMER backend v{}", env!("CARGO_PKG_VERSION"));

    let db_url = args
        .prepared_database_url()
        .context("invalid database configuration")?;
    let services = AppServices::new_sqlite(&db_url)
        .await
        .context("failed to open database")?;
    tracing::info!("database ready");

    if !args.redact_store_errors {
        tracing::warn!("teacher dashboard echoes raw store errors; set DILMER_REDACT_STORE_ERRORS=1 to hide them");
    }

    let state = AppState::new(
        services,
        ApiConfig {
            redact_store_errors: args.redact_store_errors,
        },
    );
    let app = create_router(state);

    let addr = args.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
