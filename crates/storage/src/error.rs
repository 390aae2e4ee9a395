//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (dimension mismatch, corrupt rows,
//! migration conflicts) instead of downcasting opaque boxes.

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row data could not be converted into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A vector does not fit the table's `vector(n)` column.
    #[error("embedding dimension mismatch: table expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<chatvec_embeddings::EmbeddingError> for StorageError {
    fn from(err: chatvec_embeddings::EmbeddingError) -> Self {
        Self::DataCorruption { context: "stored embedding".to_owned(), source: Box::new(err) }
    }
}
