use std::sync::Arc;

use anyhow::Result;
use chatvec_core::DatabaseConfig;
use chatvec_embeddings::EmbeddingConfig;
use chatvec_http::{AppState, create_router};
use chatvec_service::SearchService;

use super::{load_embeddings, open_storage};

pub(crate) async fn run(
    port: u16,
    host: String,
    embedding: &EmbeddingConfig,
    database: &DatabaseConfig,
) -> Result<()> {
    let storage = open_storage(database).await?;

    let embeddings = match load_embeddings(embedding).await {
        Ok(emb) => Some(emb),
        Err(e) => {
            tracing::warn!("Failed to initialize embeddings, search disabled: {}", e);
            None
        },
    };

    let search_service = Arc::new(SearchService::new(storage, embeddings));
    let router = create_router(Arc::new(AppState { search_service }));
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
