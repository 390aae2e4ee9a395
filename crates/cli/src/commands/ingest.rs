use std::path::Path;

use anyhow::Result;
use chatvec_core::{DatabaseConfig, WriteDisposition};
use chatvec_embeddings::EmbeddingConfig;
use chatvec_service::{IngestOptions, IngestService};

use super::{load_embeddings, open_storage};

pub(crate) async fn run(
    file: &Path,
    batch_size: usize,
    disposition: WriteDisposition,
    embed: bool,
    embedding: &EmbeddingConfig,
    database: &DatabaseConfig,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("conversations file not found: {}", file.display());
    }
    let embeddings = if embed { Some(load_embeddings(embedding).await?) } else { None };
    let storage = open_storage(database).await?;

    let service = IngestService::new(storage, embeddings);
    let options = IngestOptions { batch_size, disposition, embed };
    let report = service.ingest(file, &options).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
