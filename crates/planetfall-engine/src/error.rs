//! Engine error types.

use thiserror::Error;

/// Failures while saving rover memory. Load failures never surface — the
/// store falls back to fresh defaults instead.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
