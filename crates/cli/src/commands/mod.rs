pub(crate) mod extract;
pub(crate) mod ingest;
pub(crate) mod migrate;
pub(crate) mod search;
pub(crate) mod serve;

use std::sync::Arc;

use anyhow::Result;
use chatvec_core::DatabaseConfig;
use chatvec_embeddings::{EmbeddingConfig, EmbeddingProvider, EmbeddingService};
use chatvec_storage::StorageBackend;

/// Load the embedding model off the async runtime; the first use may download it.
pub(crate) async fn load_embeddings(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let config = config.clone();
    let service = tokio::task::spawn_blocking(move || EmbeddingService::new(&config)).await??;
    tracing::info!(model = service.model_name(), dimension = service.dimension(), "Embedding service initialized");
    Ok(Arc::new(service))
}

pub(crate) async fn open_storage(config: &DatabaseConfig) -> Result<Arc<StorageBackend>> {
    Ok(Arc::new(StorageBackend::new_postgres(config).await?))
}
