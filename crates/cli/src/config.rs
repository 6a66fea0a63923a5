//! Command-line configuration.

use crate::commands::Command;
use anyhow::Context;
use clap::Parser;
use corelib::NodeConfig;
use locator::Simulation;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "chord", version, about = "Drive an in-process Chord ring")]
pub struct CliConfig {
    /// Number of nodes to start.
    #[arg(long, default_value_t = 8)]
    pub nodes: usize,

    /// Width of the identifier space in bits (overrides the config file).
    #[arg(long)]
    pub bits: Option<u32>,

    /// Replication factor (overrides the config file).
    #[arg(long)]
    pub replication: Option<u32>,

    /// JSON node configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Node configuration after applying the file and then the flags.
    pub fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                NodeConfig::from_json_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => NodeConfig::default(),
        };
        if let Some(bits) = self.bits {
            config.id_bits = bits;
        }
        if let Some(factor) = self.replication {
            config.replication_factor = factor;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        anyhow::ensure!(self.nodes > 0, "--nodes must be at least 1");
        let config = self.node_config()?;
        let sim = Simulation::with_addresses(config, self.nodes)?;
        info!(nodes = sim.len(), "ring ready");

        let result = self.command.execute(&sim).await?;
        println!("{}", result);
        Ok(())
    }
}
