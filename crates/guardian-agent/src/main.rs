use anyhow::Result;
use clap::Parser;
use guardian_agent::config::{AgentArgs, AgentConfig};
use guardian_agent::{Agent, HttpSender};
use guardian_collector::RuntimeCollector;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("guardian=info".parse()?))
        .init();

    let config = AgentConfig::from_args(AgentArgs::parse())?;
    let server_url = config.server_url();
    tracing::info!(
        server = %server_url,
        poll_secs = config.poll_interval_secs,
        report_secs = config.report_interval_secs,
        wire = ?config.wire_format,
        "guardian-agent starting"
    );

    let sender = HttpSender::new(&server_url, config.wire_format, config.request_timeout())?;
    let agent = Agent::new(
        Box::new(RuntimeCollector::system()),
        Arc::new(sender),
        config.poll_interval(),
        config.report_interval(),
    );

    tokio::select! {
        _ = agent.run() => {}
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    Ok(())
}
