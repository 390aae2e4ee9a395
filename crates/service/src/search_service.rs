use std::sync::Arc;

use chatvec_core::{SimilarMessage, SimilarityQuery, StorageStats, StoredMessage};
use chatvec_embeddings::EmbeddingProvider;
use chatvec_storage::{MessageStore, StorageBackend};

use crate::ServiceError;

pub struct SearchService {
    storage: Arc<StorageBackend>,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
}

impl SearchService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, embeddings: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self { storage, embeddings }
    }

    /// Embed the query text and rank stored messages against it.
    pub async fn search(&self, query: &SimilarityQuery) -> Result<Vec<SimilarMessage>, ServiceError> {
        query.validate()?;
        let provider = self.embeddings.clone().ok_or_else(|| {
            ServiceError::NotConfigured("embedding model required for search".to_owned())
        })?;

        let text = query.query_text.clone();
        let vector = tokio::task::spawn_blocking(move || provider.embed_query(&text)).await??;

        let results = self.storage.similarity_search(&vector, &query.filter()).await?;
        tracing::info!(
            metric = %query.metric,
            limit = query.limit,
            threshold = ?query.threshold,
            results = results.len(),
            "search complete"
        );
        Ok(results)
    }

    pub async fn stats(&self) -> Result<StorageStats, ServiceError> {
        Ok(self.storage.get_stats().await?)
    }

    pub async fn get_message(&self, message_id: &str) -> Result<Option<StoredMessage>, ServiceError> {
        Ok(self.storage.get_message(message_id).await?)
    }
}
