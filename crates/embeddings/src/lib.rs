//! Embedding generation for chatvec
//!
//! A blocking [`EmbeddingProvider`] seam, batched embedding of extracted messages,
//! pgvector literal serialization and the fastembed-backed [`EmbeddingService`].

mod batch;
pub mod error;
mod literal;
mod record;
mod service;

pub use batch::{EmbeddingProvider, embed_batch};
pub use error::EmbeddingError;
pub use literal::{parse_vector_literal, vector_literal};
pub use record::EmbeddedRecord;
pub use service::{EmbeddingConfig, EmbeddingService, SUPPORTED_MODELS, model_dimension};
