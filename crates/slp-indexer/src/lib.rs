//! Read path of the SLP indexer.
//!
//! This crate layers token-level business rules over the store:
//! - [`SlpQuery`]: side-effect free lookups of address, transaction, token and
//!   sync status records
//! - [`Blacklist`]: denylist of token ids whose statistics are never disclosed
//! - [`SlpUseCases`]: argument validation, blacklist short-circuit and token
//!   history trimming on top of any [`SlpQueryApi`]

mod blacklist;
mod error;
mod queries;
mod use_cases;

pub use blacklist::{Blacklist, ConfigurationError};
pub use error::{Error, ErrorKind, Result};
pub use queries::{SlpQuery, SlpQueryApi};
pub use use_cases::{NOT_AVAILABLE, SlpUseCases, TokenView};
