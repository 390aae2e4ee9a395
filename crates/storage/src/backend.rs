//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chatvec_core::{
    DatabaseConfig, SearchFilter, SimilarMessage, StorageStats, StoredMessage, WriteDisposition,
    WriteSummary,
};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::pg_storage::PgStorage;
use crate::traits::MessageStore;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Postgres(s) => <PgStorage as MessageStore>::$method(s, $($arg),*).await,
            StorageBackend::Memory(s) => <MemoryStorage as MessageStore>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Postgres(PgStorage),
    Memory(MemoryStorage),
}

impl StorageBackend {
    pub async fn new_postgres(config: &DatabaseConfig) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgStorage::new(config).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl MessageStore for StorageBackend {
    async fn write_records(
        &self,
        records: &[StoredMessage],
        disposition: WriteDisposition,
    ) -> Result<WriteSummary, StorageError> {
        dispatch!(self, write_records(records, disposition))
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
    ) -> Result<Vec<SimilarMessage>, StorageError> {
        dispatch!(self, similarity_search(query, filter))
    }

    async fn get_stats(&self) -> Result<StorageStats, StorageError> {
        dispatch!(self, get_stats())
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<StoredMessage>, StorageError> {
        dispatch!(self, get_message(message_id))
    }
}
