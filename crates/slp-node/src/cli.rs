use crate::commands::backup::{Backup, Restore};
use crate::commands::run::Run;
use crate::commands::tools::Tools;
use crate::config::{NodeConfig, load_config, validate_config};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Open the store and serve the JSON-RPC API until interrupted.
    Run(Run),

    /// Write a snapshot of every collection.
    Backup(Backup),

    /// Restore a snapshot into the (empty) store directory.
    Restore(Restore),

    /// Utility tools.
    #[command(subcommand)]
    Tools(Tools),
}

#[derive(Debug, Parser)]
#[command(name = "slp-indexer", version, about = "SLP token indexer store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file. Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store root directory, overrides `storage.path`.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, overrides `log.level`. `RUST_LOG` takes precedence over both.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    fn node_config(&self) -> Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => NodeConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.path = data_dir.clone();
        }
        if let Some(log_level) = &self.log_level {
            config.log.level = log_level.clone();
        }
        if let Command::Run(run) = &self.command {
            run.apply_overrides(&mut config);
        }

        validate_config(&config)?;

        Ok(config)
    }
}

/// Install the global `tracing` subscriber.
pub fn init_tracing(log_level: &str) {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();
}

/// Parse and run command line arguments.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;

    init_tracing(&config.log.level);

    match cli.command {
        Command::Run(_) => crate::commands::run::run(&config).await,
        Command::Backup(backup) => backup.run(&config).await,
        Command::Restore(restore) => restore.run(&config).await,
        Command::Tools(tools) => tools.run(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "storage:\n  path: ./from-file\nrpc:\n  addr: \"127.0.0.1:6000\"\nlog:\n  level: warn\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "slp-indexer",
            "--config",
            config_path.to_str().unwrap(),
            "run",
            "--data-dir",
            "./from-flag",
            "--blacklist",
            "./blacklist.json",
            "--rpc-max-connections",
            "7",
        ]);
        let config = cli.node_config().unwrap();

        assert_eq!(config.storage.path, PathBuf::from("./from-flag"));
        assert_eq!(config.rpc.addr, "127.0.0.1:6000");
        assert_eq!(config.rpc.max_connections, 7);
        assert_eq!(config.log.level, "warn");
        assert_eq!(
            config.blacklist.path.as_deref(),
            Some(std::path::Path::new("./blacklist.json"))
        );
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::parse_from(["slp-indexer", "backup", "--dest", "/tmp/snap"]);
        assert!(matches!(cli.command, Command::Backup(_)));

        let cli = Cli::parse_from(["slp-indexer", "restore", "--from", "/tmp/snap"]);
        assert!(matches!(cli.command, Command::Restore(_)));

        let cli = Cli::parse_from(["slp-indexer", "tools", "dump-tokens", "--partial-burns"]);
        assert!(matches!(
            cli.command,
            Command::Tools(Tools::DumpTokens {
                partial_burns: true
            })
        ));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["slp-indexer", "run", "--rpc-addr", "nowhere"]);
        assert!(matches!(
            cli.node_config(),
            Err(crate::Error::Config(crate::ConfigError::Validation(_)))
        ));
    }
}
