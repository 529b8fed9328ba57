use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Bind address, `host:port`.
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_address() -> String {
    "localhost:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "guardian-server", about = "Receives agent metrics and serves the latest values")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(short = 'a', long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Optional TOML config file providing base values
    #[arg(short = 'c', long, env = "SERVER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Layers flags and environment over the config file over defaults.
    pub fn from_args(args: ServerArgs) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(address) = args.address {
            config.address = address;
        }
        if config.address.trim().is_empty() {
            anyhow::bail!("listen address must not be empty");
        }
        Ok(config)
    }
}
