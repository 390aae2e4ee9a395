use anyhow::Result;
use chatvec_core::{DatabaseConfig, SimilarMessage, SimilarityQuery};
use chatvec_embeddings::EmbeddingConfig;
use chatvec_service::SearchService;

use super::{load_embeddings, open_storage};

pub(crate) async fn run_search(
    query: &SimilarityQuery,
    embedding: &EmbeddingConfig,
    database: &DatabaseConfig,
) -> Result<()> {
    query.validate()?;
    let embeddings = load_embeddings(embedding).await?;
    let storage = open_storage(database).await?;
    let service = SearchService::new(storage, Some(embeddings));
    let results = service.search(query).await?;
    println!("{}", serde_json::to_string_pretty(&render_hits(&results)?)?);
    Ok(())
}

/// Search hits as JSON, with the epoch timestamps also rendered as RFC 3339.
fn render_hits(hits: &[SimilarMessage]) -> Result<serde_json::Value> {
    let rendered = hits
        .iter()
        .map(|hit| -> Result<serde_json::Value> {
            let mut value = serde_json::to_value(hit)?;
            if let Some(fields) = value.as_object_mut() {
                let created = hit.message.created_at().map(|t| t.to_rfc3339());
                let updated = hit.message.updated_at().map(|t| t.to_rfc3339());
                fields.insert("created_at".to_owned(), created.into());
                fields.insert("updated_at".to_owned(), updated.into());
            }
            Ok(value)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::Value::Array(rendered))
}

pub(crate) async fn run_stats(database: &DatabaseConfig) -> Result<()> {
    let storage = open_storage(database).await?;
    let service = SearchService::new(storage, None);
    let stats = service.stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
