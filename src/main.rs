use address_book::http::{router, AppState};
use address_book::lifecycle::{setup_tracing, AppConfig, AppSystem, CliArgs};
use anyhow::{anyhow, Context};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = AppConfig::from_args(CliArgs::parse()).context("invalid configuration")?;
    info!(
        storage = %config.storage,
        bind = %config.bind,
        prefix = %config.api_prefix,
        "Starting address book"
    );

    let system = AppSystem::start(&config);
    let app = router(AppState {
        broker: system.broker().clone(),
        routes: system.routes(),
    });

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    system.shutdown().await.map_err(|e| anyhow!(e))?;
    info!("Application stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
