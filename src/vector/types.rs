//! Vector store types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Distance metric for similarity search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

/// A vector index as seen by the client. The server owns it; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    pub name: String,
    pub dimension: u32,
    pub metric: Metric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_count: Option<u64>,
}

impl VectorIndex {
    pub fn new(name: impl Into<String>, dimension: u32, metric: Metric) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
            vector_count: None,
        }
    }
}

/// Body of `POST /indexes`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateIndexRequest<'a> {
    pub name: &'a str,
    pub dimension: u32,
    pub metric: Metric,
}

/// Index record as returned by the server. Every field is optional so that a
/// malformed record can be detected instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct IndexRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dimension: Option<u32>,
    #[serde(default)]
    pub vector_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListIndexesResponse {
    #[serde(default)]
    pub indexes: Option<Vec<IndexRecord>>,
}

/// Identifier of a stored vector: the API accepts strings and integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VectorId {
    Text(String),
    Number(i64),
}

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorId::Text(s) => f.write_str(s),
            VectorId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for VectorId {
    fn from(s: &str) -> Self {
        VectorId::Text(s.to_string())
    }
}

impl From<String> for VectorId {
    fn from(s: String) -> Self {
        VectorId::Text(s)
    }
}

impl From<i64> for VectorId {
    fn from(n: i64) -> Self {
        VectorId::Number(n)
    }
}

/// A vector to store. Its length must equal the index dimension; the server enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub id: VectorId,
    pub values: Vec<f32>,
}

impl Vector {
    pub fn new(id: impl Into<VectorId>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }
}

/// Outcome of `add_vectors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddVectorsResult {
    pub inserted: u64,
    pub ids: Vec<VectorId>,
}

/// A search hit. Some deployments echo the stored vector under `values`, others under `vector`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub id: VectorId,
    pub score: f32,
    #[serde(default, alias = "vector", skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchMatch>>,
}

/// Opt-in consistency mode: wait (bounded) for an eventually consistent index to
/// reflect writes, and retry searches that come back empty.
///
/// Unset fields use per-operation defaults: writes poll up to 5 times every 3 s,
/// searches make a single attempt with no delay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyOptions {
    pub enabled: bool,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl ConsistencyOptions {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }
}

pub const DEFAULT_TOP_K: usize = 10;

/// Options shared by vector writes and searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorOptions {
    /// Number of matches to return from a search.
    pub top_k: usize,
    pub consistency: Option<ConsistencyOptions>,
}

impl Default for VectorOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            consistency: None,
        }
    }
}

impl VectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_consistency(mut self, consistency: ConsistencyOptions) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn consistency_enabled(&self) -> bool {
        self.consistency.as_ref().is_some_and(|c| c.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vector_ids_serialize_untagged() {
        let v = Vector::new("a", vec![0.0, 1.0]);
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"id": "a", "values": [0.0, 1.0]})
        );
        let v = Vector::new(7i64, vec![0.5]);
        assert_eq!(serde_json::to_value(&v).unwrap()["id"], json!(7));
    }

    #[test]
    fn search_match_accepts_either_echo_field() {
        let m: SearchMatch =
            serde_json::from_value(json!({"id": "a", "score": 0.9, "vector": [1.0]})).unwrap();
        assert_eq!(m.values, Some(vec![1.0]));
        let m: SearchMatch = serde_json::from_value(json!({"id": 3, "score": 0.5})).unwrap();
        assert_eq!(m.id, VectorId::Number(3));
        assert_eq!(m.values, None);
    }

    #[test]
    fn consistency_is_off_by_default() {
        let opts = VectorOptions::default();
        assert_eq!(opts.top_k, 10);
        assert!(!opts.consistency_enabled());
        let opts = opts.with_consistency(ConsistencyOptions::default().with_max_retries(3));
        assert!(!opts.consistency_enabled());
    }
}
