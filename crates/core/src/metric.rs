//! Distance metrics and the similarity score each one ranks by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Vector comparison used for ranking. Every score is "higher is more similar",
/// but only cosine lives on a familiar scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `1 - cosine_distance`; in `[-1, 1]` for normalized embeddings.
    #[default]
    Cosine,
    /// Negated euclidean distance; always `<= 0`.
    L2,
    /// Raw inner product; unbounded.
    InnerProduct,
}

impl DistanceMetric {
    pub const ALL: [Self; 3] = [Self::Cosine, Self::L2, Self::InnerProduct];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Cosine => "cosine",
            Self::L2 => "l2",
            Self::InnerProduct => "inner_product",
        }
    }

    /// Score `stored` against `query`. NaN when the lengths differ, so ranking drops the row.
    #[must_use]
    pub fn similarity(&self, stored: &[f32], query: &[f32]) -> f64 {
        if stored.len() != query.len() {
            return f64::NAN;
        }
        match *self {
            Self::Cosine => 1.0 - cosine_distance(stored, query),
            Self::L2 => -l2_distance(stored, query),
            Self::InnerProduct => inner_product(stored, query),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Self::Cosine),
            "l2" => Ok(Self::L2),
            "inner_product" => Ok(Self::InnerProduct),
            _ => Err(CoreError::UnknownMetric(s.to_owned())),
        }
    }
}

#[must_use]
pub fn inner_product(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum()
}

#[must_use]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// `1 - cos(a, b)`. NaN when either vector has zero norm, matching pgvector.
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let norm_a = inner_product(a, a).sqrt();
    let norm_b = inner_product(b, b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return f64::NAN;
    }
    1.0 - inner_product(a, b) / (norm_a * norm_b)
}
