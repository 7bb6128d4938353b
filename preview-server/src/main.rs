//! preview-server - Smile Preview backend server
//!
//! REST API in front of the treatment preview pipeline.

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("preview_server=info".parse()?)
                .add_directive("preview_core=info".parse()?),
        )
        .init();

    info!("preview-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = config::Config::load()?;
    match &config.config_path {
        Some(path) => info!("Config loaded from {:?}", path),
        None => info!("No config file, using defaults and environment"),
    }
    info!(
        api_key = config.has_api_key(),
        references_dir = %config.references_dir.display(),
        "Generation settings"
    );

    let bind = config.bind;
    let state = state::AppState::new(config)?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %bind, "Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
