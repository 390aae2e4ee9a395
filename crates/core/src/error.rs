use std::io;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by the core crate: input loading and query validation.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("conversations file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse conversations at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown distance metric: {0} (expected cosine, l2 or inner_product)")]
    UnknownMetric(String),

    #[error("unknown write disposition: {0} (expected replace, append or merge)")]
    UnknownDisposition(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = StdResult<T, CoreError>;
