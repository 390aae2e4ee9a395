//! Conversation export documents and the file loader.
//!
//! An export is either one JSON array of conversation objects or newline-delimited
//! JSON with one conversation per line.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// A single exported conversation.
///
/// `mapping` keeps node ids in document order; extraction walks it in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mapping: Option<Map<String, Value>>,
}

/// Read every conversation from `path`.
///
/// A missing file is reported before anything is parsed.
pub fn load_conversations(path: &Path) -> Result<Vec<ConversationDocument>> {
    if !path.exists() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let documents = parse_conversations(&content)?;
    tracing::info!(path = %path.display(), conversations = documents.len(), "loaded conversations");
    Ok(documents)
}

/// Parse an export held in memory. See [`load_conversations`].
pub fn parse_conversations(content: &str) -> Result<Vec<ConversationDocument>> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|source| CoreError::Parse { line: source.line(), source });
    }
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| CoreError::Parse { line: idx + 1, source })
        })
        .collect()
}
