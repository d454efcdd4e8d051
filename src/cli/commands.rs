// src/cli/commands.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DERO stratum miner client
#[derive(Parser, Debug)]
#[command(name = "dero-miner-rs")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (start the miner or generate a config file)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the miner application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Start the miner console, status monitor and stats API
    Start(StartOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for starting the miner
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Mine on testnet (overrides config)
    #[arg(long)]
    pub testnet: bool,

    /// Pool URL (overrides config)
    #[arg(short, long)]
    pub pool: Option<String>,

    /// Serve the stats API on this address (overrides config, enables the API)
    #[arg(long)]
    pub api_listen: Option<String>,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_overrides() {
        let cli = Commands::parse_from([
            "dero-miner-rs",
            "start",
            "--testnet",
            "--pool",
            "stratum+tcp://pool:10300",
            "--api-listen",
            "0.0.0.0:8989",
        ]);
        let Action::Start(opts) = cli.action else {
            panic!("expected start action");
        };
        assert!(opts.testnet);
        assert_eq!(opts.pool.as_deref(), Some("stratum+tcp://pool:10300"));
        assert_eq!(opts.api_listen.as_deref(), Some("0.0.0.0:8989"));
        assert!(opts.config.is_none());
    }

    #[test]
    fn test_config_default_output() {
        let cli = Commands::parse_from(["dero-miner-rs", "config"]);
        let Action::Config(opts) = cli.action else {
            panic!("expected config action");
        };
        assert_eq!(opts.output, PathBuf::from("config.toml"));
    }
}
