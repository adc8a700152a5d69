use serde::{Deserialize, Serialize};

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
pub const RELEVANCE_EPSILON: f64 = 1e-6;
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// Tunables for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results returned per query.
    pub max_result_document_count: usize,
    /// Relevances closer than this are ordered by rating.
    pub relevance_epsilon: f64,
    /// Buckets in the parallel relevance accumulator.
    pub bucket_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_result_document_count: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            bucket_count: DEFAULT_BUCKET_COUNT,
        }
    }
}
