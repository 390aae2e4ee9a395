use chatvec_core::{StoredMessage, WriteDisposition, WriteSummary};
use chatvec_embeddings::vector_literal;

use super::PgStorage;
use crate::error::StorageError;

fn insert_sql(table: &str, disposition: WriteDisposition) -> String {
    let conflict = match disposition {
        WriteDisposition::Replace | WriteDisposition::Append => "ON CONFLICT (message_id) DO NOTHING",
        WriteDisposition::Merge => {
            "ON CONFLICT (message_id) DO UPDATE SET
                conversation_id = EXCLUDED.conversation_id,
                role = EXCLUDED.role,
                text = EXCLUDED.text,
                embedding = EXCLUDED.embedding,
                create_time = EXCLUDED.create_time,
                update_time = EXCLUDED.update_time"
        },
    };
    format!(
        "INSERT INTO {table}
            (message_id, conversation_id, role, text, embedding, create_time, update_time)
         VALUES ($1, $2, $3, $4, $5::vector, $6, $7)
         {conflict}"
    )
}

pub(crate) async fn write_records(
    storage: &PgStorage,
    records: &[StoredMessage],
    disposition: WriteDisposition,
) -> Result<WriteSummary, StorageError> {
    for embedding in records.iter().filter_map(|r| r.embedding.as_ref()) {
        if embedding.len() != storage.dimension {
            return Err(StorageError::DimensionMismatch {
                expected: storage.dimension,
                actual: embedding.len(),
            });
        }
    }

    let mut tx = storage.pool.begin().await?;
    if disposition == WriteDisposition::Replace {
        sqlx::query(&format!("TRUNCATE {}", storage.table)).execute(&mut *tx).await?;
    }

    let sql = insert_sql(&storage.table, disposition);
    let mut summary = WriteSummary::default();
    for record in records {
        let message = &record.message;
        let result = sqlx::query(&sql)
            .bind(&message.message_id)
            .bind(&message.conversation_id)
            .bind(&message.role)
            .bind(&message.text)
            .bind(record.embedding.as_deref().map(vector_literal))
            .bind(message.create_time)
            .bind(message.update_time)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            summary.skipped_existing += 1;
        } else {
            summary.written += 1;
        }
    }
    tx.commit().await?;

    tracing::info!(
        table = %storage.table,
        disposition = %disposition,
        written = summary.written,
        skipped = summary.skipped_existing,
        "stored messages"
    );
    Ok(summary)
}
