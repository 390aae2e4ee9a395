//! Similarity query parameters and the in-memory ranking shared by non-SQL backends.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::error::{CoreError, Result};
use crate::message::{SimilarMessage, StoredMessage};
use crate::metric::DistanceMetric;

/// A text query as received from the CLI or HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityQuery {
    pub query_text: String,
    pub limit: usize,
    pub threshold: Option<f64>,
    pub role: Option<String>,
    pub conversation_id: Option<String>,
    pub metric: DistanceMetric,
}

impl SimilarityQuery {
    #[must_use]
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            threshold: None,
            role: None,
            conversation_id: None,
            metric: DistanceMetric::default(),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_conversation(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    /// Reject blank queries, limits outside `1..=MAX_SEARCH_LIMIT` and non-finite thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.query_text.trim().is_empty() {
            return Err(CoreError::InvalidInput("query must not be empty".to_owned()));
        }
        if self.limit == 0 || self.limit > MAX_SEARCH_LIMIT {
            return Err(CoreError::InvalidInput(format!(
                "limit must be between 1 and {MAX_SEARCH_LIMIT}, got {}",
                self.limit
            )));
        }
        if let Some(threshold) = self.threshold
            && !threshold.is_finite()
        {
            return Err(CoreError::InvalidInput("threshold must be a finite number".to_owned()));
        }
        Ok(())
    }

    /// The vector-side filter, once the query text has been embedded.
    #[must_use]
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            limit: self.limit,
            threshold: self.threshold,
            role: self.role.clone(),
            conversation_id: self.conversation_id.clone(),
            metric: self.metric,
        }
    }
}

/// Everything storage needs to rank rows against an already-embedded query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub limit: usize,
    pub threshold: Option<f64>,
    pub role: Option<String>,
    pub conversation_id: Option<String>,
    pub metric: DistanceMetric,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            threshold: None,
            role: None,
            conversation_id: None,
            metric: DistanceMetric::default(),
        }
    }
}

impl SearchFilter {
    /// Exact role and conversation match. Rows without a vector never match.
    #[must_use]
    pub fn matches(&self, row: &StoredMessage) -> bool {
        if row.embedding.is_none() {
            return false;
        }
        if let Some(role) = &self.role
            && row.message.role != *role
        {
            return false;
        }
        if let Some(conversation_id) = &self.conversation_id
            && row.message.conversation_id != *conversation_id
        {
            return false;
        }
        true
    }
}

/// Score every matching row, drop NaN and below-threshold scores, sort descending, truncate.
/// Ties keep input order.
pub fn rank<'a, I>(rows: I, query: &[f32], filter: &SearchFilter) -> Vec<SimilarMessage>
where
    I: IntoIterator<Item = &'a StoredMessage>,
{
    let mut scored: Vec<SimilarMessage> = rows
        .into_iter()
        .filter(|row| filter.matches(row))
        .filter_map(|row| {
            let embedding = row.embedding.as_deref()?;
            let similarity = filter.metric.similarity(embedding, query);
            if similarity.is_nan() {
                return None;
            }
            if filter.threshold.is_some_and(|t| similarity < t) {
                return None;
            }
            Some(SimilarMessage { message: row.message.clone(), similarity })
        })
        .collect();

    scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    scored.truncate(filter.limit);
    scored
}
