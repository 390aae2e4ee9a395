//! Storage backend trait abstraction.

use async_trait::async_trait;
use chatvec_core::{
    SearchFilter, SimilarMessage, StorageStats, StoredMessage, WriteDisposition, WriteSummary,
};

use crate::error::StorageError;

/// Persistence for embedded messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Write all records in one transaction under the given disposition.
    async fn write_records(
        &self,
        records: &[StoredMessage],
        disposition: WriteDisposition,
    ) -> Result<WriteSummary, StorageError>;

    /// Rank rows with a vector against `query`, highest similarity first.
    async fn similarity_search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
    ) -> Result<Vec<SimilarMessage>, StorageError>;

    async fn get_stats(&self) -> Result<StorageStats, StorageError>;

    async fn get_message(&self, message_id: &str) -> Result<Option<StoredMessage>, StorageError>;
}
