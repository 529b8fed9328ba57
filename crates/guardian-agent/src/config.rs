use crate::sender::WireFormat;
use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// Server address, `host:port` or a full URL.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,
    #[serde(default)]
    pub wire_format: WireFormat,
    /// Per-request timeout for reports
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_address() -> String {
    "localhost:8080".to_string()
}

fn default_poll_interval() -> u64 {
    2
}

fn default_report_interval() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            poll_interval_secs: default_poll_interval(),
            report_interval_secs: default_report_interval(),
            wire_format: WireFormat::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Command-line flags. Each flag falls back to its environment variable.
#[derive(Debug, Parser)]
#[command(
    name = "guardian-agent",
    about = "Collects runtime metrics and reports them to the server"
)]
pub struct AgentArgs {
    /// Address of the metrics server
    #[arg(short = 'a', long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Poll interval in seconds
    #[arg(short = 'p', long = "poll-interval", env = "POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Report interval in seconds
    #[arg(short = 'r', long = "report-interval", env = "REPORT_INTERVAL")]
    pub report_interval: Option<u64>,

    /// Wire shape used for updates
    #[arg(short = 'w', long = "wire-format", env = "WIRE_FORMAT", value_enum)]
    pub wire_format: Option<WireFormat>,

    /// Optional TOML config file providing base values
    #[arg(short = 'c', long, env = "AGENT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl AgentConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Layers flags and environment over the config file over defaults.
    pub fn from_args(args: AgentArgs) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(address) = args.address {
            config.address = address;
        }
        if let Some(secs) = args.poll_interval {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = args.report_interval {
            config.report_interval_secs = secs;
        }
        if let Some(format) = args.wire_format {
            config.wire_format = format;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.address.trim().is_empty() {
            bail!("server address must not be empty");
        }
        if self.poll_interval_secs == 0 {
            bail!("poll interval must be greater than zero");
        }
        if self.report_interval_secs == 0 {
            bail!("report interval must be greater than zero");
        }
        if let Some((scheme, _)) = self.address.trim().split_once("://") {
            if scheme != "http" && scheme != "https" {
                bail!("unsupported server scheme '{scheme}', expected http or https");
            }
        }
        Ok(())
    }

    /// Base URL of the server; `http://` is assumed when no scheme is given.
    pub fn server_url(&self) -> String {
        let addr = self.address.trim().trim_end_matches('/');
        if addr.contains("://") {
            return addr.to_string();
        }
        format!("http://{addr}")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
