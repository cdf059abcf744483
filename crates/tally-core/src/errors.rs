//! Error types for the evaluation pipeline.
//!
//! Backend and embedder failures are carried transparently so callers see the
//! provider's own error, unchanged.

use crate::cache::CacheError;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The model backend failed during `qa` / `batch_qa` / `data_to_str`.
    #[error(transparent)]
    Backend(anyhow::Error),

    /// The persistent response cache could not be opened, read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The embedder failed or returned unusable vectors.
    #[error("embedding error: {0}")]
    Embedding(anyhow::Error),

    /// Malformed configuration or inconsistent inputs.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl EvalError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);

impl From<ConfigError> for EvalError {
    fn from(e: ConfigError) -> Self {
        EvalError::Config { message: e.0 }
    }
}
