use chatvec_core::{RoleCount, StorageStats};
use sqlx::Row;

use super::{PgStorage, count_to_u64};
use crate::error::StorageError;

pub(crate) async fn get_stats(storage: &PgStorage) -> Result<StorageStats, StorageError> {
    let table = &storage.table;
    let total: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}")).fetch_one(&storage.pool).await?;
    let with_embeddings: i64 = sqlx::query_scalar(&format!("SELECT COUNT(embedding) FROM {table}"))
        .fetch_one(&storage.pool)
        .await?;
    let rows = sqlx::query(&format!(
        "SELECT role, COUNT(*) AS count FROM {table} GROUP BY role ORDER BY count DESC, role"
    ))
    .fetch_all(&storage.pool)
    .await?;

    let role_distribution = rows
        .iter()
        .map(|row| -> Result<RoleCount, StorageError> {
            Ok(RoleCount { role: row.try_get("role")?, count: count_to_u64(row.try_get("count")?) })
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

    Ok(StorageStats {
        total_messages: count_to_u64(total),
        messages_with_embeddings: count_to_u64(with_embeddings),
        role_distribution,
    })
}
