use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for alias table and expansion operations.
pub type AliasResult<T> = Result<T, AliasError>;

/// Errors raised by alias table operations.
#[derive(Debug, Error)]
pub enum AliasError {
    /// The expansion buffer could not be allocated.
    #[error("allocation failure: {0}")]
    Allocation(#[from] TryReserveError),

    /// No alias is defined under the given key.
    #[error("no such alias key: {0}")]
    NotFound(String),

    /// Alias keys must not be empty.
    #[error("invalid alias key: key must not be empty")]
    InvalidKey,

    /// A key or value exceeded its limit while truncation is disabled.
    #[error("alias {what} is {len} characters long (max {max})")]
    TooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// A line of `alias` listing output could not be parsed back.
    #[error("malformed alias listing line: {0}")]
    MalformedListing(String),
}

/// Errors raised while locating or loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    MissingHome(&'static str),

    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
