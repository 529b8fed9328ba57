use anyhow::{Context, Result};
use clap::Parser;
use guardian_server::app;
use guardian_server::config::{ServerArgs, ServerConfig};
use guardian_server::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("guardian=info".parse()?))
        .init();

    let config = ServerConfig::from_args(ServerArgs::parse())?;

    let state = AppState::in_memory();
    let app = app::build_http_app(state);

    let listener = TcpListener::bind(&config.address)
        .await
        .with_context(|| format!("failed to bind {}", config.address))?;
    tracing::info!(addr = %config.address, "guardian-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    Ok(())
}
