//! Typed error enum for the embeddings crate.

use thiserror::Error;

/// Errors from embedding generation and vector serialization.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("unknown embedding model: {0}")]
    UnknownModel(String),
    #[error("embedding model initialization failed: {0}")]
    ModelInit(String),
    #[error("embedding mutex lock poisoned")]
    LockPoisoned,
    #[error("embedding generation returned empty result")]
    EmptyResult,
    #[error("embedding generation failed: {0}")]
    Generation(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("embedding count mismatch: sent {expected} texts, got {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },
    #[error("embedding contains a non-finite component at index {index}")]
    NonFinite { index: usize },
    #[error("invalid vector literal: {0}")]
    InvalidLiteral(String),
}
