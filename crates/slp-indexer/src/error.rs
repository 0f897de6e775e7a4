/// Indexer read-path errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A store operation failed; `source` carries the original failure.
    #[error("{operation}({key:?}): {source}")]
    Store {
        operation: &'static str,
        key: String,
        #[source]
        source: slp_storage::Error,
    },
}

/// Coarse classification used when reporting errors to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Store,
}

impl Error {
    pub(crate) fn store(
        operation: &'static str,
        key: &str,
    ) -> impl FnOnce(slp_storage::Error) -> Self {
        let key = key.to_string();
        move |source| Self::Store {
            operation,
            key,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Store { source, .. } if source.is_not_found() => ErrorKind::NotFound,
            Self::Store { source, .. } if source.is_invalid_argument() => {
                ErrorKind::InvalidArgument
            }
            Self::Store { .. } => ErrorKind::Store,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use slp_storage::CollectionId;

    #[test]
    fn test_kind_follows_store_failure() {
        let not_found = Error::store("get_token", "abc")(slp_storage::Error::NotFound {
            collection: CollectionId::Token,
            key: "abc".into(),
        });
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(
            not_found.to_string(),
            "get_token(\"abc\"): Key \"abc\" not found in tokens"
        );

        let closed = Error::store("get_tx", "abc")(slp_storage::Error::Closed(
            CollectionId::Transaction,
        ));
        assert_eq!(closed.kind(), ErrorKind::Store);

        assert_eq!(
            Error::InvalidArgument("empty".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_invalid_store_argument_is_client_error() {
        let empty_key = Error::store("get_address", "")(slp_storage::Error::InvalidArgument(
            "empty key".into(),
        ));
        assert_eq!(empty_key.kind(), ErrorKind::InvalidArgument);
    }
}
