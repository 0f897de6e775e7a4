use crate::config::NodeConfig;
use crate::error::Result;
use clap::Parser;
use slp_storage::StoreManager;
use std::path::PathBuf;

/// Snapshot the store into a new directory.
#[derive(Debug, Clone, Parser)]
pub struct Backup {
    /// Destination directory; must not exist or be empty.
    #[arg(long)]
    pub dest: PathBuf,
}

impl Backup {
    pub async fn run(self, config: &NodeConfig) -> Result<()> {
        let store = StoreManager::open(&config.store_config())?;
        let dest = self.dest;

        let backed_up = tokio::task::block_in_place(|| store.backup(&dest));
        let closed = tokio::task::block_in_place(|| store.close_all());

        backed_up?;
        closed?;

        println!("Backup written to {}", dest.display());

        Ok(())
    }
}

/// Copy a snapshot back into the store directory. The store must not be running.
#[derive(Debug, Clone, Parser)]
pub struct Restore {
    /// Snapshot directory produced by `backup`.
    #[arg(long)]
    pub from: PathBuf,
}

impl Restore {
    pub async fn run(self, config: &NodeConfig) -> Result<()> {
        let root = config.storage.path.clone();
        tokio::task::block_in_place(|| StoreManager::restore(&self.from, &root))?;

        println!("Restored {} into {}", self.from.display(), root.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slp_primitives::{STATUS_KEY, SyncStatus};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_backup_then_restore() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::default();
        config.storage.path = dir.path().join("current");
        config.storage.hot_cache_size = 8 << 20;

        let status = SyncStatus {
            start_block_height: 543_376,
            synced_block_height: 800_000,
            chain_block_height: 800_002,
        };
        {
            let store = StoreManager::open(&config.store_config()).unwrap();
            store.status().put_status(&status).await.unwrap();
            store.close_all().unwrap();
        }

        let snapshot = dir.path().join("snapshot");
        Backup {
            dest: snapshot.clone(),
        }
        .run(&config)
        .await
        .unwrap();

        let mut restored = config.clone();
        restored.storage.path = dir.path().join("restored");
        Restore { from: snapshot }.run(&restored).await.unwrap();

        let store = StoreManager::open(&restored.store_config()).unwrap();
        assert_eq!(store.status().get(STATUS_KEY).await.unwrap(), status);
        store.close_all().unwrap();
    }
}
