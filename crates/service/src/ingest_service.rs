use std::path::Path;
use std::sync::Arc;

use chatvec_core::constants::DEFAULT_BATCH_SIZE;
use chatvec_core::{StoredMessage, WriteDisposition, extract_all, load_conversations};
use chatvec_embeddings::{EmbeddingProvider, embed_batch};
use chatvec_storage::{MessageStore, StorageBackend};
use serde::Serialize;

use crate::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub disposition: WriteDisposition,
    /// When false, rows are stored with a NULL vector and no model is touched.
    pub embed: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE, disposition: WriteDisposition::default(), embed: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub conversations: usize,
    pub messages: usize,
    pub skipped_nodes: usize,
    pub stored: u64,
    pub skipped_existing: u64,
    /// Vector width, absent when nothing was embedded.
    pub dimension: Option<usize>,
}

pub struct IngestService {
    storage: Arc<StorageBackend>,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
}

impl IngestService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, embeddings: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self { storage, embeddings }
    }

    /// Load, extract, embed and store every message of a conversations file.
    pub async fn ingest(&self, path: &Path, options: &IngestOptions) -> Result<IngestReport, ServiceError> {
        let conversations = load_conversations(path)?;
        let extraction = extract_all(&conversations);
        let mut report = IngestReport {
            conversations: conversations.len(),
            messages: extraction.messages.len(),
            skipped_nodes: extraction.skipped.len(),
            ..IngestReport::default()
        };

        if extraction.messages.is_empty() {
            tracing::warn!(path = %path.display(), "no messages extracted; nothing to store");
            return Ok(report);
        }

        let records: Vec<StoredMessage> = if options.embed {
            let provider = self.embeddings.clone().ok_or_else(|| {
                ServiceError::NotConfigured("embedding model required for ingestion".to_owned())
            })?;
            let messages = extraction.messages;
            let batch_size = options.batch_size;
            let embedded = tokio::task::spawn_blocking(move || {
                embed_batch(messages, provider.as_ref(), batch_size)
            })
            .await??;
            report.dimension = embedded.first().map(|r| r.dimension());
            embedded.into_iter().map(StoredMessage::from).collect()
        } else {
            extraction.messages.into_iter().map(StoredMessage::without_embedding).collect()
        };

        let summary = self.storage.write_records(&records, options.disposition).await?;
        report.stored = summary.written;
        report.skipped_existing = summary.skipped_existing;

        tracing::info!(
            conversations = report.conversations,
            messages = report.messages,
            stored = report.stored,
            skipped_existing = report.skipped_existing,
            disposition = %options.disposition,
            "ingestion complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chatvec_core::CoreError;
    use chatvec_embeddings::EmbeddingError;

    use super::*;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for CountingProvider {
        fn model_name(&self) -> &str {
            "counting"
        }

        fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![1.0, t.len() as f32]).collect())
        }
    }

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const TWO_MESSAGES: &str = r#"[{"title": "T", "mapping": {
        "n1": {"message": {"id": "m1", "author": {"role": "user"}, "content": {"parts": ["Hi", "there"]}}},
        "n2": {"message": null},
        "n3": {"message": {"id": "m2", "author": {"role": "assistant"}, "content": {"parts": ["Hello"]}}}
    }}]"#;

    fn service(provider: Option<Arc<CountingProvider>>) -> (IngestService, Arc<StorageBackend>) {
        let storage = Arc::new(StorageBackend::new_memory());
        let embeddings = provider.map(|p| p as Arc<dyn EmbeddingProvider>);
        (IngestService::new(Arc::clone(&storage), embeddings), storage)
    }

    #[tokio::test]
    async fn test_ingest_embeds_and_stores() {
        let provider = Arc::new(CountingProvider::default());
        let (service, storage) = service(Some(Arc::clone(&provider)));
        let file = write_file(TWO_MESSAGES);
        let options = IngestOptions { batch_size: 1, ..IngestOptions::default() };

        let report = service.ingest(file.path(), &options).await.unwrap();

        assert_eq!(report.conversations, 1);
        assert_eq!(report.messages, 2);
        assert_eq!(report.skipped_nodes, 1);
        assert_eq!(report.stored, 2);
        assert_eq!(report.dimension, Some(2));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        let row = storage.get_message("m1").await.unwrap().unwrap();
        assert_eq!(row.message.text, "Hi there");
        assert_eq!(row.embedding, Some(vec![1.0, 8.0]));
    }

    #[tokio::test]
    async fn test_ingest_without_embeddings_stores_null_vectors() {
        let (service, storage) = service(None);
        let file = write_file(TWO_MESSAGES);
        let options = IngestOptions { embed: false, ..IngestOptions::default() };

        let report = service.ingest(file.path(), &options).await.unwrap();

        assert_eq!(report.stored, 2);
        assert_eq!(report.dimension, None);
        let stats = storage.get_stats().await.unwrap();
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.messages_with_embeddings, 0);
    }

    #[tokio::test]
    async fn test_empty_extraction_never_calls_embedder() {
        let provider = Arc::new(CountingProvider::default());
        let (service, storage) = service(Some(Arc::clone(&provider)));
        let file = write_file(r#"{"title": "Empty", "mapping": {}}"#);

        let report = service.ingest(file.path(), &IngestOptions::default()).await.unwrap();

        assert_eq!(report.conversations, 1);
        assert_eq!(report.stored, 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(storage.get_stats().await.unwrap().total_messages, 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let (service, _storage) = service(Some(Arc::new(CountingProvider::default())));
        let err = service
            .ingest(Path::new("/definitely/not/here.json"), &IngestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Input(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_embedding_requires_provider() {
        let (service, _storage) = service(None);
        let file = write_file(TWO_MESSAGES);
        let err = service.ingest(file.path(), &IngestOptions::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_append_reports_existing_rows() {
        let (service, _storage) = service(Some(Arc::new(CountingProvider::default())));
        let file = write_file(TWO_MESSAGES);
        let append = IngestOptions { disposition: WriteDisposition::Append, ..IngestOptions::default() };

        service.ingest(file.path(), &append).await.unwrap();
        let report = service.ingest(file.path(), &append).await.unwrap();

        assert_eq!(report.stored, 0);
        assert_eq!(report.skipped_existing, 2);
    }
}
