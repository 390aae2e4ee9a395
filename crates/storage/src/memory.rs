//! In-process message store, ranked with the same scoring as the SQL backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chatvec_core::{
    RoleCount, SearchFilter, SimilarMessage, StorageStats, StoredMessage, WriteDisposition,
    WriteSummary, rank,
};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::MessageStore;

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    rows: Arc<RwLock<Vec<StoredMessage>>>,
    dimension: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject vectors whose length differs from `dimension`, as a `vector(n)` column would.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { rows: Arc::default(), dimension: Some(dimension) }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check_dimensions(&self, records: &[StoredMessage]) -> Result<(), StorageError> {
        let Some(expected) = self.dimension else {
            return Ok(());
        };
        for embedding in records.iter().filter_map(|r| r.embedding.as_ref()) {
            if embedding.len() != expected {
                return Err(StorageError::DimensionMismatch { expected, actual: embedding.len() });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStorage {
    async fn write_records(
        &self,
        records: &[StoredMessage],
        disposition: WriteDisposition,
    ) -> Result<WriteSummary, StorageError> {
        self.check_dimensions(records)?;
        let mut rows = self.rows.write().await;
        // Work on a copy so a failure leaves the table untouched.
        let mut staged = match disposition {
            WriteDisposition::Replace => Vec::with_capacity(records.len()),
            WriteDisposition::Append | WriteDisposition::Merge => rows.clone(),
        };
        let mut index: HashMap<String, usize> = staged
            .iter()
            .enumerate()
            .map(|(i, row)| (row.message.message_id.clone(), i))
            .collect();

        let mut summary = WriteSummary::default();
        for record in records {
            match (index.get(&record.message.message_id), disposition) {
                (Some(&i), WriteDisposition::Merge) => {
                    if let Some(slot) = staged.get_mut(i) {
                        *slot = record.clone();
                    }
                    summary.written += 1;
                },
                (Some(_), WriteDisposition::Replace | WriteDisposition::Append) => {
                    summary.skipped_existing += 1;
                },
                (None, _) => {
                    index.insert(record.message.message_id.clone(), staged.len());
                    staged.push(record.clone());
                    summary.written += 1;
                },
            }
        }
        *rows = staged;
        tracing::debug!(
            disposition = %disposition,
            written = summary.written,
            skipped = summary.skipped_existing,
            "memory write"
        );
        Ok(summary)
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
    ) -> Result<Vec<SimilarMessage>, StorageError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.rows.read().await;
        // Without a configured width, the stored rows define it.
        let expected = self
            .dimension
            .or_else(|| rows.iter().find_map(|r| r.embedding.as_ref().map(Vec::len)));
        if let Some(expected) = expected
            && query.len() != expected
        {
            return Err(StorageError::DimensionMismatch { expected, actual: query.len() });
        }
        Ok(rank(rows.iter(), query, filter))
    }

    async fn get_stats(&self) -> Result<StorageStats, StorageError> {
        let rows = self.rows.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for row in rows.iter() {
            *counts.entry(row.message.role.as_str()).or_default() += 1;
        }
        let mut role_distribution: Vec<RoleCount> = counts
            .into_iter()
            .map(|(role, count)| RoleCount { role: role.to_owned(), count })
            .collect();
        // BTreeMap order breaks ties by role; stable sort keeps it.
        role_distribution.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(StorageStats {
            total_messages: rows.len() as u64,
            messages_with_embeddings: rows.iter().filter(|r| r.embedding.is_some()).count() as u64,
            role_distribution,
        })
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<StoredMessage>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.message.message_id == message_id).cloned())
    }
}
