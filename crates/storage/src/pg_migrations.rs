//! PostgreSQL schema migrations for chatvec storage.

use chatvec_core::DatabaseConfig;
use sqlx::PgPool;

use crate::error::StorageError;

/// Create the pgvector extension, schema, messages table and indexes. Idempotent.
///
/// Fails when the table already exists with a different `vector(n)` width.
pub async fn run_pg_migrations(pool: &PgPool, config: &DatabaseConfig) -> Result<(), StorageError> {
    let table = config.qualified_table();

    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector").execute(pool).await?;

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", config.schema))
        .execute(pool)
        .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            message_id TEXT PRIMARY KEY,
            conversation_id TEXT NOT NULL,
            role TEXT NOT NULL,
            text TEXT NOT NULL,
            embedding vector({dim}),
            create_time DOUBLE PRECISION,
            update_time DOUBLE PRECISION
        )
        "#,
        dim = config.dimension,
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS \"{}_conversation_idx\" ON {table} (conversation_id)",
        config.table
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!("CREATE INDEX IF NOT EXISTS \"{}_role_idx\" ON {table} (role)", config.table))
        .execute(pool)
        .await?;

    let existing: Option<i32> = sqlx::query_scalar(
        "SELECT a.atttypmod
           FROM pg_attribute a
           JOIN pg_class c ON c.oid = a.attrelid
           JOIN pg_namespace n ON n.oid = c.relnamespace
          WHERE n.nspname = $1 AND c.relname = $2 AND a.attname = 'embedding'",
    )
    .bind(&config.schema)
    .bind(&config.table)
    .fetch_optional(pool)
    .await?;

    if let Some(width) = existing
        && width > 0
        && usize::try_from(width).ok() != Some(config.dimension)
    {
        return Err(StorageError::Migration(format!(
            "{table}.embedding is vector({width}) but {} dimensions are configured",
            config.dimension
        )));
    }

    tracing::info!(table = %table, dimension = config.dimension, "PostgreSQL migrations applied");
    Ok(())
}
