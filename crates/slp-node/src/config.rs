//! Node configuration, loaded from YAML and overridden from the command line.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use slp_storage::{DEFAULT_HOT_CACHE_SIZE, StoreConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub blacklist: BlacklistConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Store root; one directory per collection is created beneath it.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Block cache in bytes for each of the address and transaction collections.
    #[serde(default = "default_hot_cache_size")]
    pub hot_cache_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            hot_cache_size: default_hot_cache_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_addr")]
    pub addr: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            addr: default_rpc_addr(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlacklistConfig {
    /// JSON array of blacklisted token ids. Required by `run`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./leveldb/current")
}

fn default_hot_cache_size() -> usize {
    DEFAULT_HOT_CACHE_SIZE
}

fn default_rpc_addr() -> String {
    "127.0.0.1:5010".to_string()
}

fn default_max_connections() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl NodeConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.storage.path.clone(),
            hot_cache_size: self.storage.hot_cache_size,
        }
    }

    /// RPC listen address. Only valid after [`validate_config`] succeeded.
    pub fn rpc_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.rpc.addr.parse().map_err(|err| {
            ConfigError::Validation(vec![format!("rpc.addr {:?}: {err}", self.rpc.addr)])
        })
    }

    /// The blacklist file, which the server cannot start without.
    pub fn blacklist_path(&self) -> Result<&Path, ConfigError> {
        self.blacklist.path.as_deref().ok_or_else(|| {
            ConfigError::Validation(vec![
                "blacklist.path is required to serve token queries".to_string(),
            ])
        })
    }
}

/// Load and validate configuration from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NodeConfig, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    load_config_from_str(&content, &path_str)
}

/// Load and validate configuration from a YAML string.
pub fn load_config_from_str(content: &str, source_name: &str) -> Result<NodeConfig, ConfigError> {
    let config: NodeConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        path: source_name.to_string(),
        source: e,
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Check every value, reporting all problems at once.
pub fn validate_config(config: &NodeConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.storage.path.as_os_str().is_empty() {
        errors.push("storage.path must not be empty".to_string());
    }
    if config.storage.hot_cache_size == 0 {
        errors.push("storage.hot_cache_size must be greater than zero".to_string());
    }
    if let Err(err) = config.rpc.addr.parse::<SocketAddr>() {
        errors.push(format!("rpc.addr {:?} is not a socket address: {err}", config.rpc.addr));
    }
    if config.rpc.max_connections == 0 {
        errors.push("rpc.max_connections must be greater than zero".to_string());
    }
    if matches!(&config.blacklist.path, Some(path) if path.as_os_str().is_empty()) {
        errors.push("blacklist.path must not be empty".to_string());
    }
    if !LOG_LEVELS.contains(&config.log.level.to_lowercase().as_str()) {
        errors.push(format!(
            "log.level {:?} must be one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}
