//! Storage layer for chatvec
//!
//! PostgreSQL with pgvector for production, plus an in-memory store with the
//! same ranking semantics. Both sit behind [`MessageStore`].

mod backend;
pub mod error;
mod memory;
mod pg_migrations;
pub mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
pub use traits::MessageStore;
