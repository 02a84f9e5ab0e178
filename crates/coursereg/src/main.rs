use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use coursereg::config::AppConfig;
use coursereg::server::create_router;
use coursereg::types::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            AppConfig::load(&path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            AppConfig::default()
        }
    };

    let address = config.bind_address.clone();
    let state = Arc::new(AppState::from_config(config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {address}"))?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
