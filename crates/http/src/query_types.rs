//! Request/query types (Deserialize)

use chatvec_core::constants::DEFAULT_SEARCH_LIMIT;
use chatvec_core::{DistanceMetric, SimilarityQuery};
use serde::Deserialize;

use crate::api_error::ApiError;

const fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

/// Search parameters, accepted both as a JSON body and as a query string.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Minimum score on the metric's own scale. Absent means no cutoff, so pass `0.0`
    /// to drop negatively correlated cosine matches.
    pub threshold: Option<f64>,
    pub role: Option<String>,
    pub conversation_id: Option<String>,
    /// Parsed separately so an unknown name is reported as a 400 with the accepted names.
    pub metric: Option<String>,
}

impl SearchRequest {
    pub fn into_query(self) -> Result<SimilarityQuery, ApiError> {
        let metric = match self.metric.as_deref() {
            Some(name) if !name.trim().is_empty() => name.parse::<DistanceMetric>()?,
            _ => DistanceMetric::default(),
        };
        let query = SimilarityQuery::new(self.query)
            .with_limit(self.limit)
            .with_threshold(self.threshold)
            .with_role(self.role.filter(|r| !r.is_empty()))
            .with_conversation(self.conversation_id.filter(|c| !c.is_empty()))
            .with_metric(metric);
        query.validate()?;
        Ok(query)
    }
}
