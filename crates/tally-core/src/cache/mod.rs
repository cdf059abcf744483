//! Persistent response cache.
//!
//! A cache directory holds one SQLite database. Handles are short-lived: the
//! evaluator opens one per inference call and drops it before returning.

pub mod key;
mod schema;
pub mod store;

pub use key::cache_key;
pub use store::{CacheStats, ResponseCache, DEFAULT_SIZE_LIMIT};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to prepare cache directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
