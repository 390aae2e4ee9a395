//! Database configuration resolved from the environment.

use crate::constants::{DEFAULT_SCHEMA, DEFAULT_TABLE, DEFAULT_VECTOR_DIMENSION};
use crate::env_config::{env_parse_with_default, env_string, env_string_or};
use crate::error::{CoreError, Result};

/// Connection and table settings for the messages store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub schema: String,
    pub table: String,
    pub dimension: usize,
}

impl DatabaseConfig {
    /// Build from `DATABASE_URL`, or from the `POSTGRES_*` variables when it is unset.
    ///
    /// Schema, table and vector width come from `CHATVEC_SCHEMA`, `CHATVEC_TABLE`
    /// and `CHATVEC_VECTOR_DIM`.
    pub fn from_env() -> Result<Self> {
        let url = env_string("DATABASE_URL").unwrap_or_else(|| {
            let host = env_string_or("POSTGRES_HOST", "localhost");
            let port: u16 = env_parse_with_default("POSTGRES_PORT", 5432);
            let database = env_string_or("POSTGRES_DATABASE", "chatvec");
            let user = env_string_or("POSTGRES_USER", "chatvec");
            let password = env_string_or("POSTGRES_PASSWORD", "chatvec");
            format!("postgres://{user}:{password}@{host}:{port}/{database}")
        });
        Self::new(
            url,
            env_string_or("CHATVEC_SCHEMA", DEFAULT_SCHEMA),
            env_string_or("CHATVEC_TABLE", DEFAULT_TABLE),
            env_parse_with_default("CHATVEC_VECTOR_DIM", DEFAULT_VECTOR_DIMENSION),
        )
    }

    pub fn new(url: String, schema: String, table: String, dimension: usize) -> Result<Self> {
        validate_identifier(&schema)?;
        validate_identifier(&table)?;
        if dimension == 0 {
            return Err(CoreError::InvalidInput("vector dimension must be positive".to_owned()));
        }
        Ok(Self { url, schema, table, dimension })
    }

    /// Quoted `"schema"."table"` reference for SQL text.
    #[must_use]
    pub fn qualified_table(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema, self.table)
    }

    /// Connection URL with the password masked, for logs.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.split_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{scheme}://{user}:***@{host}")
            },
            None => self.url.clone(),
        }
    }
}

/// Accept only plain SQL identifiers: ASCII letter or `_`, then letters, digits, `_`.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_head = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_head && valid_tail && name.len() <= 63 {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!("invalid SQL identifier: {name:?}")))
    }
}
