//! Typed error enum for the service layer.
//!
//! Unifies input, storage and embedding failures into a single error type,
//! enabling callers to match on specific failure modes.

use chatvec_core::CoreError;
use chatvec_embeddings::EmbeddingError;
use chatvec_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying input, storage and embedding failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input file or query could not be used (missing file, parse error, bad metric).
    #[error(transparent)]
    Input(#[from] CoreError),

    /// Storage operation failed (database, dimension mismatch, corrupt row).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Embedding generation failed.
    #[error("embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Required backend (embedding model) is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// A blocking worker task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
