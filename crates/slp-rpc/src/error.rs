use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::types::error::{ErrorObject, INVALID_PARAMS_CODE};
use slp_indexer::ErrorKind;

/// SLP RPC Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// SLP RPC errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Indexer(#[from] slp_indexer::Error),
    #[error(transparent)]
    Store(#[from] slp_storage::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Other error type.
    #[error("{0}")]
    Other(String),
}

/// Base error code for RPC modules.
pub mod base {
    pub const SLP: i32 = 10000;
}

/// Base error code for all SLP errors.
const BASE_ERROR: i32 = base::SLP;

/// The requested record does not exist.
pub const NOT_FOUND: i32 = BASE_ERROR + 1;

/// The store failed to serve the request.
pub const STORE_FAILURE: i32 = BASE_ERROR + 2;

impl Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Indexer(err) => err.kind(),
            Self::Store(err) if err.is_not_found() => ErrorKind::NotFound,
            Self::Store(err) if err.is_invalid_argument() => ErrorKind::InvalidArgument,
            Self::Store(_) | Self::Other(_) => ErrorKind::Store,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl From<Error> for ErrorObjectOwned {
    fn from(e: Error) -> ErrorObjectOwned {
        let code = match e.kind() {
            ErrorKind::InvalidArgument => INVALID_PARAMS_CODE,
            ErrorKind::NotFound => NOT_FOUND,
            ErrorKind::Store => STORE_FAILURE,
        };
        if code == STORE_FAILURE {
            tracing::error!("RPC request failed: {e}");
        }
        ErrorObject::owned(code, e.to_string(), None::<()>)
    }
}
