use anyhow::{Context, Result};
use polyglot_bot::{config::Config, pipeline::PipelineComponent, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_bot=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting action server ({}) on port {}",
        config.environment, config.port
    );

    // A model that fails to load stops startup here
    let state = server::AppState::from_config(config)?;
    let pipeline = state.pipeline.clone();
    let port = state.config.port;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, server::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pipeline.persist()?;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
