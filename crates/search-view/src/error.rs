//! Error types for the search-view crate.

use thiserror::Error;

/// Errors from the preference store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on preference store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Preference store {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
