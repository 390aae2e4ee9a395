//! PostgreSQL storage backend using sqlx and pgvector.
//!
//! Split into modular files by concern.

mod search;
mod stats;
mod write;

use std::time::Duration;

use async_trait::async_trait;
use chatvec_core::constants::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use chatvec_core::{
    DatabaseConfig, Message, SearchFilter, SimilarMessage, StorageStats, StoredMessage,
    WriteDisposition, WriteSummary,
};
use chatvec_embeddings::parse_vector_literal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;
use crate::traits::MessageStore;

/// Column list shared by every query that reads messages back.
const MESSAGE_COLUMNS: &str = "message_id, conversation_id, role, text, create_time, update_time";

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
    table: String,
    dimension: usize,
}

impl PgStorage {
    /// Connect and apply migrations.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;
        run_pg_migrations(&pool, config).await?;
        tracing::info!(url = %config.redacted_url(), table = %config.qualified_table(), "PgStorage initialized");
        Ok(Self { pool, table: config.qualified_table(), dimension: config.dimension })
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn count_to_u64(val: i64) -> u64 {
    u64::try_from(val).unwrap_or(0)
}

pub(crate) fn row_to_message(row: &PgRow) -> Result<Message, StorageError> {
    Ok(Message {
        conversation_id: row.try_get("conversation_id")?,
        message_id: row.try_get("message_id")?,
        role: row.try_get("role")?,
        text: row.try_get("text")?,
        create_time: row.try_get("create_time")?,
        update_time: row.try_get("update_time")?,
    })
}

/// Expects the vector selected as `embedding::text AS embedding`.
pub(crate) fn row_to_stored(row: &PgRow) -> Result<StoredMessage, StorageError> {
    let literal: Option<String> = row.try_get("embedding")?;
    let embedding = literal.as_deref().map(parse_vector_literal).transpose()?;
    Ok(StoredMessage::new(row_to_message(row)?, embedding))
}

#[async_trait]
impl MessageStore for PgStorage {
    async fn write_records(
        &self,
        records: &[StoredMessage],
        disposition: WriteDisposition,
    ) -> Result<WriteSummary, StorageError> {
        write::write_records(self, records, disposition).await
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
    ) -> Result<Vec<SimilarMessage>, StorageError> {
        search::similarity_search(self, query, filter).await
    }

    async fn get_stats(&self) -> Result<StorageStats, StorageError> {
        stats::get_stats(self).await
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<StoredMessage>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS}, embedding::text AS embedding FROM {} WHERE message_id = $1",
            self.table
        ))
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_stored).transpose()
    }
}
