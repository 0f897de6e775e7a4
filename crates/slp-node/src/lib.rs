//! SLP Indexer Node Library.
//!
//! The main feature of this library is to start and run the indexer store and its
//! RPC server as a CLI application.

mod cli;
mod commands;
mod config;
mod error;

pub use self::cli::run;
pub use self::config::{NodeConfig, load_config, load_config_from_str};
pub use self::error::{ConfigError, Error, Result};
