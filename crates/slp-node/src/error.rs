use slp_storage::CloseError;

/// Configuration could not be loaded or is invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Node errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blacklist(#[from] slp_indexer::ConfigurationError),

    #[error(transparent)]
    Store(#[from] slp_storage::Error),

    #[error(transparent)]
    StoreClose(#[from] CloseError),

    #[error("RPC server error: {0}")]
    Rpc(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
