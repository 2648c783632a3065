//! Vector store client.

use super::consistency::{self, Convergence, RetryBudget, INDEX_SETTLE_DELAY};
use super::types::{
    AddVectorsResult, CreateIndexRequest, IndexRecord, ListIndexesResponse, Metric, SearchMatch,
    SearchResponse, Vector, VectorId, VectorIndex, VectorOptions,
};
use crate::client::endpoint::CapabilityScope;
use crate::error_code::ErrorCode;
use crate::transport::HttpTransport;
use crate::{Error, Result};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Vector indexes, vector writes and similarity search.
///
/// The backing index is eventually consistent. Writes and searches accept
/// [`VectorOptions::consistency`] to trade bounded extra latency for a better
/// chance of reading their own writes.
#[derive(Debug, Clone, Copy)]
pub struct VectorStore<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> VectorStore<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            scope: CapabilityScope::new(transport, "/v1"),
        }
    }

    fn index_path(&self, name: &str, suffix: &str) -> String {
        self.scope
            .endpoint(&format!("/indexes/{}{}", encode_path_segment(name), suffix))
    }

    /// Create an index, then wait a fixed settle delay before returning.
    ///
    /// Only the HTTP status is checked; creation is not read back.
    pub async fn create_index(&self, config: &VectorIndex) -> Result<()> {
        let body = CreateIndexRequest {
            name: &config.name,
            dimension: config.dimension,
            metric: config.metric,
        };
        let _: Value = self
            .scope
            .transport
            .post(&self.scope.endpoint("/indexes"), &body)
            .await?;
        debug!(index = %config.name, "index created, waiting for propagation");
        tokio::time::sleep(INDEX_SETTLE_DELAY).await;
        Ok(())
    }

    /// List all indexes.
    ///
    /// The server does not round-trip the configured metric, so every index is
    /// reported as [`Metric::Cosine`].
    pub async fn list_indexes(&self) -> Result<Vec<VectorIndex>> {
        let response: ListIndexesResponse = self
            .scope
            .transport
            .get(&self.scope.endpoint("/indexes"))
            .await?;

        Ok(response
            .indexes
            .unwrap_or_default()
            .into_iter()
            .map(|record| VectorIndex {
                name: record.name.unwrap_or_default(),
                dimension: record.dimension.unwrap_or_default(),
                metric: Metric::Cosine,
                vector_count: record.vector_count,
            })
            .collect())
    }

    /// Fetch one index.
    ///
    /// Returns `None` when the index does not exist (HTTP 404) and when the server
    /// answers with a record lacking `name` or `dimension`.
    pub async fn get_index(&self, name: &str) -> Result<Option<VectorIndex>> {
        let value: Value = match self.scope.transport.get(&self.index_path(name, "")).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        if value.is_null() {
            return Ok(None);
        }

        let record = match serde_json::from_value::<IndexRecord>(value.clone()) {
            Ok(IndexRecord {
                name: Some(record_name),
                dimension: Some(dimension),
                vector_count,
            }) => VectorIndex {
                name: record_name,
                dimension,
                metric: Metric::Cosine,
                vector_count: Some(vector_count.unwrap_or(0)),
            },
            _ => {
                warn!(index = %name, response = %value, "invalid index response format");
                return Ok(None);
            }
        };
        Ok(Some(record))
    }

    /// Delete an index. Deleting an index that does not exist succeeds.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        match self
            .scope
            .transport
            .delete::<Value>(&self.index_path(name, ""), None)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(index = %name, "index already absent");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Store vectors in an index.
    ///
    /// With consistency enabled the index must already exist (`INDEX_NOT_FOUND`
    /// otherwise, and nothing is written), and after the write the index is polled
    /// until its count reflects the insert or the budget runs out. Running out is
    /// not an error: the write itself already succeeded.
    pub async fn add_vectors(
        &self,
        index_name: &str,
        vectors: &[Vector],
        options: &VectorOptions,
    ) -> Result<AddVectorsResult> {
        let policy = options.consistency.as_ref().filter(|c| c.enabled);

        let before = match policy {
            Some(_) => Some(self.current_count(index_name).await?),
            None => None,
        };

        let response: Value = self
            .scope
            .transport
            .post(
                &self.index_path(index_name, "/vectors"),
                &json!({ "vectors": vectors }),
            )
            .await?;
        let result = parse_add_vectors(&response)?;

        if let (Some(policy), Some(before)) = (policy, before) {
            let expected = before + vectors.len() as u64;
            let budget = RetryBudget::for_writes(policy);
            let outcome = consistency::await_count(budget, expected, || async move {
                Ok(self
                    .get_index(index_name)
                    .await?
                    .and_then(|index| index.vector_count))
            })
            .await?;

            match outcome {
                Convergence::Converged { attempts } => {
                    debug!(index = %index_name, expected, attempts, "vectors visible");
                }
                Convergence::Exhausted {
                    attempts,
                    last_observed,
                } => {
                    info!(
                        index = %index_name,
                        expected,
                        observed = ?last_observed,
                        attempts,
                        "vector count did not converge within the retry budget"
                    );
                }
            }
        }

        Ok(result)
    }

    async fn current_count(&self, index_name: &str) -> Result<u64> {
        match self.get_index(index_name).await? {
            Some(index) => Ok(index.vector_count.unwrap_or(0)),
            None => Err(Error::api(
                ErrorCode::IndexNotFound,
                format!("Index {} not found", index_name),
                Some(404),
                None,
            )),
        }
    }

    /// Delete vectors by id. No consistency polling is done for deletes.
    pub async fn delete_vectors(&self, index_name: &str, ids: &[VectorId]) -> Result<()> {
        let body = json!({ "ids": ids });
        let _: Value = self
            .scope
            .transport
            .delete(&self.index_path(index_name, "/vectors"), Some(&body))
            .await?;
        Ok(())
    }

    /// Search for the `top_k` vectors most similar to `vector`.
    ///
    /// An empty result is returned as-is unless consistency is enabled, in which
    /// case the search is retried within the budget. "No matches" after the last
    /// attempt is an empty list, not an error.
    pub async fn search_vector(
        &self,
        index_name: &str,
        vector: &[f32],
        options: &VectorOptions,
    ) -> Result<Vec<SearchMatch>> {
        let budget = RetryBudget::for_search(options.consistency.as_ref());
        let endpoint = self.index_path(index_name, "/search");
        let body = json!({ "vector": vector, "limit": options.top_k });

        consistency::retry_search(budget, options.consistency_enabled(), || {
            let endpoint = &endpoint;
            let body = &body;
            async move {
                let response: SearchResponse = self.scope.transport.post(endpoint, body).await?;
                Ok(response.results.unwrap_or_default())
            }
        })
        .await
    }
}

/// Percent-encode an index name for use as a single path segment.
fn encode_path_segment(name: &str) -> String {
    // form encoding escapes every reserved byte; only its `+` for space differs.
    url::form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `inserted` must be a non-negative integer; `1.7` or `-1` are not coerced.
fn parse_add_vectors(response: &Value) -> Result<AddVectorsResult> {
    let Some(inserted) = response.get("inserted").and_then(Value::as_u64) else {
        return Err(Error::invalid_response(
            "Invalid response from add vectors",
            Some(500),
        ));
    };

    let ids = match response.get("ids") {
        Some(ids) if !ids.is_null() => serde_json::from_value(ids.clone()).map_err(|e| {
            Error::invalid_response(format!("Invalid ids in add vectors response: {}", e), Some(500))
        })?,
        _ => Vec::new(),
    };

    Ok(AddVectorsResult { inserted, ids })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_vectors_response_requires_integer_inserted() {
        let result = parse_add_vectors(&json!({"inserted": 2, "ids": ["a", 7]})).unwrap();
        assert_eq!(result.inserted, 2);
        assert_eq!(result.ids, vec![VectorId::from("a"), VectorId::from(7i64)]);

        let result = parse_add_vectors(&json!({"inserted": 1})).unwrap();
        assert!(result.ids.is_empty());

        for bad in [
            json!({}),
            json!({"inserted": "1"}),
            json!({"inserted": 1.7}),
            json!({"inserted": -1}),
            json!(null),
            json!([1]),
        ] {
            let err = parse_add_vectors(&bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_RESPONSE");
            assert_eq!(err.status_code(), Some(500));
        }
    }

    #[test]
    fn index_names_are_encoded_as_one_segment() {
        assert_eq!(encode_path_segment("docs-v1_2.x"), "docs-v1_2.x");
        assert_eq!(encode_path_segment("a/b c#d?e"), "a%2Fb%20c%23d%3Fe");
        assert_eq!(encode_path_segment("1+1%"), "1%2B1%25");
    }
}
