//! How an ingestion run treats rows already present in the table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteDisposition {
    /// Empty the table, then insert every record.
    #[default]
    Replace,
    /// Insert new records; rows whose `message_id` already exists are left untouched.
    Append,
    /// Insert new records and overwrite rows sharing a `message_id`.
    Merge,
}

impl WriteDisposition {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Replace => "replace",
            Self::Append => "append",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for WriteDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteDisposition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            "merge" => Ok(Self::Merge),
            _ => Err(CoreError::UnknownDisposition(s.to_owned())),
        }
    }
}

/// Outcome of a storage write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    /// Rows inserted or overwritten.
    pub written: u64,
    /// Rows skipped because their `message_id` was already present.
    pub skipped_existing: u64,
}
