//! The embedding seam and batched embedding of extracted messages.

use chatvec_core::Message;

use crate::error::EmbeddingError;
use crate::record::EmbeddedRecord;

/// A sentence embedding backend. Calls block; async callers go through `spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    fn model_name(&self) -> &str;

    /// One vector per input text, in input order.
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_texts(&[text.to_owned()])?;
        if vectors.len() > 1 {
            return Err(EmbeddingError::CountMismatch { expected: 1, actual: vectors.len() });
        }
        let vector = vectors.pop().ok_or(EmbeddingError::EmptyResult)?;
        if vector.is_empty() {
            return Err(EmbeddingError::EmptyResult);
        }
        Ok(vector)
    }
}

/// Embed every message, `batch_size` texts per provider call.
///
/// Output order and values do not depend on `batch_size`. Any provider failure,
/// count mismatch, dimension change or non-finite component fails the whole call.
pub fn embed_batch<P>(
    messages: Vec<Message>,
    provider: &P,
    batch_size: usize,
) -> Result<Vec<EmbeddedRecord>, EmbeddingError>
where
    P: EmbeddingProvider + ?Sized,
{
    if messages.is_empty() {
        return Ok(Vec::new());
    }
    let batch_size = batch_size.max(1);
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(messages.len());
    let mut dimension: Option<usize> = None;

    for (batch_index, chunk) in messages.chunks(batch_size).enumerate() {
        let texts: Vec<String> = chunk.iter().map(|m| m.text.clone()).collect();
        let batch = provider.embed_texts(&texts)?;
        if batch.len() != chunk.len() {
            return Err(EmbeddingError::CountMismatch { expected: chunk.len(), actual: batch.len() });
        }
        for vector in batch {
            let expected = *dimension.get_or_insert(vector.len());
            if expected == 0 {
                return Err(EmbeddingError::EmptyResult);
            }
            if vector.len() != expected {
                return Err(EmbeddingError::DimensionMismatch { expected, actual: vector.len() });
            }
            if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
                return Err(EmbeddingError::NonFinite { index });
            }
            vectors.push(vector);
        }
        tracing::debug!(batch = batch_index, size = chunk.len(), "embedded batch");
    }

    tracing::info!(
        model = provider.model_name(),
        count = vectors.len(),
        dimension = dimension.unwrap_or_default(),
        "generated embeddings"
    );
    Ok(messages.into_iter().zip(vectors).map(|(m, v)| EmbeddedRecord::new(m, v)).collect())
}
