use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The denylist could not be loaded at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to read blacklist {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Blacklist {} is not a JSON array of token ids: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Token ids whose statistics must not be disclosed.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Blacklist {
    token_ids: HashSet<String>,
}

impl Blacklist {
    pub fn new<I, S>(token_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            token_ids: token_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the denylist from a JSON array of token ids.
    ///
    /// A missing or malformed file is an error; only an explicit `[]` yields an
    /// empty list.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let token_ids: Vec<String> =
            serde_json::from_str(&content).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let blacklist = Self::new(token_ids);

        tracing::info!(
            "Loaded {} blacklisted token(s) from {}",
            blacklist.len(),
            path.display()
        );

        Ok(blacklist)
    }

    pub fn is_blacklisted(&self, token_id: &str) -> bool {
        self.token_ids.contains(token_id)
    }

    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }
}
