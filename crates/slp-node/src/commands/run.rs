use crate::config::NodeConfig;
use crate::error::{Error, Result};
use clap::Parser;
use jsonrpsee::Methods;
use jsonrpsee::server::Server;
use slp_indexer::{Blacklist, SlpQuery, SlpUseCases};
use slp_rpc::SlpRpc;
use slp_storage::StoreManager;
use std::path::PathBuf;
use std::sync::Arc;

/// The `run` command used to serve the indexed data.
#[derive(Debug, Clone, Parser)]
pub struct Run {
    /// RPC listen address, overrides `rpc.addr`.
    #[arg(long)]
    pub rpc_addr: Option<String>,

    /// Maximum number of concurrent RPC connections, overrides `rpc.max_connections`.
    #[arg(long)]
    pub rpc_max_connections: Option<u32>,

    /// Blacklist file (JSON array of token ids), overrides `blacklist.path`.
    #[arg(long)]
    pub blacklist: Option<PathBuf>,
}

impl Run {
    pub fn apply_overrides(&self, config: &mut NodeConfig) {
        if let Some(addr) = &self.rpc_addr {
            config.rpc.addr = addr.clone();
        }
        if let Some(max_connections) = self.rpc_max_connections {
            config.rpc.max_connections = max_connections;
        }
        if let Some(blacklist) = &self.blacklist {
            config.blacklist.path = Some(blacklist.clone());
        }
    }
}

/// Register every RPC method served by the node.
pub fn rpc_methods(store: Arc<StoreManager>, blacklist: Arc<Blacklist>) -> Result<Methods> {
    let use_cases = SlpUseCases::new(Arc::new(SlpQuery::new(&store)), blacklist);

    let mut methods = Methods::new();
    SlpRpc::new(use_cases, store)
        .merge_into(&mut methods)
        .map_err(|err| Error::Rpc(err.to_string()))?;

    Ok(methods)
}

/// Serve until Ctrl-C, then shut the server down and close the store.
pub async fn run(config: &NodeConfig) -> Result<()> {
    // Configuration problems must surface before the store is touched.
    let blacklist = Arc::new(Blacklist::load(config.blacklist_path()?)?);
    let rpc_addr = config.rpc_addr()?;

    let store = Arc::new(StoreManager::open(&config.store_config())?);

    let served = serve(config, rpc_addr, store.clone(), blacklist).await;

    let closed = tokio::task::block_in_place(|| store.close_all());

    served?;
    closed?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn serve(
    config: &NodeConfig,
    rpc_addr: std::net::SocketAddr,
    store: Arc<StoreManager>,
    blacklist: Arc<Blacklist>,
) -> Result<()> {
    let methods = rpc_methods(store, blacklist)?;

    let server = Server::builder()
        .max_connections(config.rpc.max_connections)
        .build(rpc_addr)
        .await?;
    let local_addr = server.local_addr()?;
    let handle = server.start(methods);

    tracing::info!("🚀 RPC server listening on {local_addr}");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Received Ctrl-C, shutting down");

    if handle.stop().is_ok() {
        handle.stopped().await;
    }

    Ok(())
}
