//! Flat message records produced by extraction and held by storage.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One extracted conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub conversation_id: String,
    pub message_id: String,
    pub role: String,
    pub text: String,
    /// Epoch seconds, passed through from the export unmodified.
    pub create_time: Option<f64>,
    pub update_time: Option<f64>,
}

impl Message {
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time.and_then(epoch_to_datetime)
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.update_time.and_then(epoch_to_datetime)
    }
}

/// Convert fractional epoch seconds to a UTC timestamp. Zero and out-of-range values yield `None`.
#[must_use]
pub fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs == 0.0 {
        return None;
    }
    let whole = secs.floor();
    #[allow(clippy::cast_possible_truncation, reason = "range checked by from_timestamp")]
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    #[allow(clippy::cast_possible_truncation, reason = "range checked by from_timestamp")]
    let seconds = whole as i64;
    DateTime::from_timestamp(seconds, nanos)
}

/// A message row as held by storage. `embedding` is `None` for rows ingested without vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(flatten)]
    pub message: Message,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

impl StoredMessage {
    #[must_use]
    pub const fn new(message: Message, embedding: Option<Vec<f32>>) -> Self {
        Self { message, embedding }
    }

    #[must_use]
    pub const fn without_embedding(message: Message) -> Self {
        Self { message, embedding: None }
    }
}

/// A stored message annotated with its similarity to a query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMessage {
    #[serde(flatten)]
    pub message: Message,
    pub similarity: f64,
}

/// Message count for a single author role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_messages: u64,
    pub messages_with_embeddings: u64,
    /// Ordered by count descending, then role. Serialized as a `{role: count}` object in that order.
    #[serde(with = "role_map")]
    pub role_distribution: Vec<RoleCount>,
}

mod role_map {
    use super::{Deserializer, MapAccess, RoleCount, Serializer, Visitor, fmt};

    pub fn serialize<S: Serializer>(counts: &[RoleCount], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(counts.iter().map(|c| (c.role.as_str(), c.count)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RoleCount>, D::Error> {
        deserializer.deserialize_map(RoleMapVisitor)
    }

    struct RoleMapVisitor;

    impl<'de> Visitor<'de> for RoleMapVisitor {
        type Value = Vec<RoleCount>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of role to message count")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut counts = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((role, count)) = map.next_entry::<String, u64>()? {
                counts.push(RoleCount { role, count });
            }
            Ok(counts)
        }
    }
}
