//! Embedded messages as they leave the batcher.

use chatvec_core::{Message, StoredMessage};
use serde::Serialize;

use crate::literal::vector_literal;

/// A message paired with its embedding, ready for storage.
///
/// Serializes flat with `embedding` as the pgvector literal string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedRecord {
    #[serde(flatten)]
    message: Message,
    embedding: String,
    #[serde(skip)]
    vector: Vec<f32>,
}

impl EmbeddedRecord {
    #[must_use]
    pub fn new(message: Message, vector: Vec<f32>) -> Self {
        let embedding = vector_literal(&vector);
        Self { message, embedding, vector }
    }

    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.message
    }

    #[must_use]
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// The pgvector literal, e.g. `[0.12,-0.55]`.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.embedding
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

impl From<EmbeddedRecord> for StoredMessage {
    fn from(record: EmbeddedRecord) -> Self {
        Self::new(record.message, Some(record.vector))
    }
}
