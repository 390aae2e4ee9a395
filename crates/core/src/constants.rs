//! Shared constants for chatvec.

/// Default number of search results when the caller gives no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Upper bound on search results per request (DoS protection).
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Default embedding batch size during ingestion.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Embedding vector dimension of the default model (all-MiniLM-L6-v2).
pub const DEFAULT_VECTOR_DIMENSION: usize = 384;

/// Default sentence embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Fallback used for missing conversation titles and author roles.
pub const UNKNOWN: &str = "unknown";

/// Default PostgreSQL schema holding the messages table.
pub const DEFAULT_SCHEMA: &str = "chatvec";

/// Default messages table name.
pub const DEFAULT_TABLE: &str = "conversations";

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;
