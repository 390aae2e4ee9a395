//! Flattens a conversation's node mapping into ordered [`Message`] records.
//!
//! Exports routinely contain partial nodes (system stubs, tool calls without text,
//! branches with null messages). Such nodes are skipped, never failed; the
//! [`ExtractionReport`] says which ones and why.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::UNKNOWN;
use crate::conversation::ConversationDocument;
use crate::message::Message;

/// Why a mapping node produced no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoMessage,
    NoContent,
    NoParts,
    BlankText,
    /// A node, message, content or parts value had the wrong JSON shape.
    Malformed(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedNode {
    pub conversation_id: String,
    pub node_id: String,
    pub reason: SkipReason,
}

/// Messages extracted from one or more conversations plus the nodes that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub messages: Vec<Message>,
    pub skipped: Vec<SkippedNode>,
}

impl ExtractionReport {
    fn absorb(&mut self, other: Self) {
        self.messages.extend(other.messages);
        self.skipped.extend(other.skipped);
    }
}

/// Extract the messages of one conversation, in mapping order.
#[must_use]
pub fn extract(conversation: &ConversationDocument) -> Vec<Message> {
    extract_with_report(conversation).messages
}

/// Like [`extract`], also recording every skipped node.
#[must_use]
pub fn extract_with_report(conversation: &ConversationDocument) -> ExtractionReport {
    let conversation_id = conversation.title.as_deref().unwrap_or(UNKNOWN);
    let mut report = ExtractionReport::default();
    let Some(mapping) = conversation.mapping.as_ref() else {
        return report;
    };

    for (node_id, node) in mapping {
        match extract_node(conversation_id, node_id, node) {
            Ok(message) => report.messages.push(message),
            Err(reason) => {
                tracing::debug!(conversation_id, node_id = node_id.as_str(), ?reason, "skipping node");
                report.skipped.push(SkippedNode {
                    conversation_id: conversation_id.to_owned(),
                    node_id: node_id.clone(),
                    reason,
                });
            },
        }
    }
    report
}

/// Extract every conversation in order and concatenate the results.
#[must_use]
pub fn extract_all(conversations: &[ConversationDocument]) -> ExtractionReport {
    let mut report = ExtractionReport::default();
    for conversation in conversations {
        report.absorb(extract_with_report(conversation));
    }
    tracing::info!(
        conversations = conversations.len(),
        messages = report.messages.len(),
        skipped = report.skipped.len(),
        "extracted messages"
    );
    report
}

fn extract_node(conversation_id: &str, node_id: &str, node: &Value) -> Result<Message, SkipReason> {
    let node = node.as_object().ok_or(SkipReason::Malformed("node"))?;
    let message = match node.get("message") {
        None | Some(Value::Null) => return Err(SkipReason::NoMessage),
        Some(Value::Object(m)) if m.is_empty() => return Err(SkipReason::NoMessage),
        Some(Value::Object(m)) => m,
        Some(_) => return Err(SkipReason::Malformed("message")),
    };

    let content = match message.get("content") {
        None | Some(Value::Null) => return Err(SkipReason::NoContent),
        Some(Value::Object(c)) if c.is_empty() => return Err(SkipReason::NoContent),
        Some(Value::Object(c)) => c,
        Some(_) => return Err(SkipReason::Malformed("content")),
    };

    let parts = match content.get("parts") {
        None | Some(Value::Null) => return Err(SkipReason::NoParts),
        Some(Value::Array(p)) if p.is_empty() => return Err(SkipReason::NoParts),
        Some(Value::Array(p)) => p,
        Some(_) => return Err(SkipReason::Malformed("parts")),
    };

    let joined = parts.iter().filter_map(part_text).collect::<Vec<_>>().join(" ");
    let text = joined.trim();
    if text.is_empty() {
        return Err(SkipReason::BlankText);
    }

    Ok(Message {
        conversation_id: conversation_id.to_owned(),
        message_id: scalar_text(message.get("id")).unwrap_or_else(|| node_id.to_owned()),
        role: author_role(message).unwrap_or_else(|| UNKNOWN.to_owned()),
        text: text.to_owned(),
        create_time: message.get("create_time").and_then(Value::as_f64),
        update_time: message.get("update_time").and_then(Value::as_f64),
    })
}

fn author_role(message: &Map<String, Value>) -> Option<String> {
    let author = message.get("author")?.as_object()?;
    scalar_text(author.get("role"))
}

/// String form of an id-like scalar. Null and absent values yield `None`.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Render one content part. Empty values (null, `""`, `false`, zero, `[]`, `{}`) are dropped.
fn part_text(part: &Value) -> Option<String> {
    match part {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}
