//! Create the pgvector extension, schema, messages table and indexes.

use anyhow::Result;
use chatvec_core::DatabaseConfig;
use chatvec_storage::PgStorage;

pub(crate) async fn run(database: &DatabaseConfig) -> Result<()> {
    let storage = PgStorage::new(database).await?;
    println!(
        "Migrations applied: {} (vector({}))",
        database.qualified_table(),
        storage.dimension()
    );
    Ok(())
}
