use crate::config::NodeConfig;
use crate::error::Result;
use parking_lot::Mutex;
use serde::Serialize;
use slp_primitives::{TokenStats, TxRecord, UtxoEntry};
use slp_storage::{Collection, Record, StoreManager};
use std::io::Write;
use std::sync::Arc;

/// Utilities
#[derive(Debug, clap::Subcommand)]
pub enum Tools {
    /// Print every token as a JSON line, with the history replaced by its length.
    #[command(name = "dump-tokens")]
    DumpTokens {
        /// Only print tokens that were partially burned, or burned more than minted.
        #[arg(long)]
        partial_burns: bool,
    },

    /// Print every UTXO entry as a JSON line.
    #[command(name = "dump-utxos")]
    DumpUtxos,

    /// Print every transaction as a JSON line.
    #[command(name = "dump-txs")]
    DumpTxs,
}

/// Token statistics with the transaction count in place of the history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenSummary {
    #[serde(flatten)]
    stats: TokenStats,
    total_txs: usize,
}

/// Newline-delimited JSON writer shared with the store scan.
struct JsonLines<W> {
    out: W,
    written: usize,
    error: Option<std::io::Error>,
}

impl<W: Write> JsonLines<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            written: 0,
            error: None,
        }
    }

    /// Returns `false` once writing failed, which stops the scan.
    fn emit(&mut self, value: &impl Serialize) -> bool {
        let result = serde_json::to_vec(value)
            .map_err(std::io::Error::from)
            .and_then(|mut line| {
                line.push(b'\n');
                self.out.write_all(&line)
            });
        match result {
            Ok(()) => {
                self.written += 1;
                true
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }
}

type Sink<W> = Arc<Mutex<JsonLines<W>>>;

/// Scan `collection`, writing each line produced by `render`.
///
/// Stops at the first line that cannot be encoded or written and returns that error.
async fn dump<V, W, R, F>(collection: Collection<V>, sink: &Sink<W>, mut render: F) -> Result<usize>
where
    V: Record,
    W: Write + Send + 'static,
    R: Serialize,
    F: FnMut(V) -> Option<R> + Send + 'static,
{
    let scan_sink = sink.clone();
    collection
        .scan(move |_key, record| match render(record) {
            Some(line) => scan_sink.lock().emit(&line),
            None => true,
        })
        .await?;

    let mut sink = sink.lock();
    if let Some(err) = sink.error.take() {
        return Err(err.into());
    }
    sink.out.flush()?;
    Ok(sink.written)
}

async fn dump_tokens<W: Write + Send + 'static>(
    store: &StoreManager,
    partial_burns: bool,
    sink: &Sink<W>,
) -> Result<usize> {
    dump(store.tokens(), sink, move |record| {
        if partial_burns && !record.burn_state().is_anomaly() {
            return None;
        }
        Some(TokenSummary {
            total_txs: record.txs.len(),
            stats: record.into_stats(),
        })
    })
    .await
}

async fn dump_utxos<W: Write + Send + 'static>(
    store: &StoreManager,
    sink: &Sink<W>,
) -> Result<usize> {
    dump(store.utxos(), sink, |entry: UtxoEntry| Some(entry)).await
}

async fn dump_txs<W: Write + Send + 'static>(
    store: &StoreManager,
    sink: &Sink<W>,
) -> Result<usize> {
    dump(store.transactions(), sink, |tx: TxRecord| Some(tx)).await
}

impl Tools {
    pub async fn run(self, config: &NodeConfig) -> Result<()> {
        let store = StoreManager::open(&config.store_config())?;
        let sink = Arc::new(Mutex::new(JsonLines::new(std::io::stdout())));

        let dumped = match self {
            Self::DumpTokens { partial_burns } => dump_tokens(&store, partial_burns, &sink).await,
            Self::DumpUtxos => dump_utxos(&store, &sink).await,
            Self::DumpTxs => dump_txs(&store, &sink).await,
        };
        let closed = tokio::task::block_in_place(|| store.close_all());

        let count = dumped?;
        closed?;

        tracing::info!("Dumped {count} entries");

        Ok(())
    }
}
