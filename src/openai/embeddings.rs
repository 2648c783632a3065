//! OpenAI-compatible embeddings.

use crate::client::endpoint::CapabilityScope;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /v1/embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub input: EmbeddingInput,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingRequest {
    fn with_input(model: impl Into<String>, input: EmbeddingInput) -> Self {
        Self {
            input,
            model: model.into(),
            dimensions: None,
            encoding_format: None,
            user: None,
            extra: Map::new(),
        }
    }

    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_input(model, EmbeddingInput::Single(text.into()))
    }

    pub fn batch(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self::with_input(model, EmbeddingInput::Batch(texts))
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Ask for `"float"` or `"base64"` embeddings.
    pub fn with_encoding_format(mut self, format: impl Into<String>) -> Self {
        self.encoding_format = Some(format.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An embedding as sent by the server: a float array, or a base64 string of
/// little-endian `f32`s when the request asked for `encoding_format: "base64"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingVector {
    Float(Vec<f32>),
    Base64(String),
}

impl EmbeddingVector {
    /// The values as floats, decoding the base64 form.
    pub fn to_floats(&self) -> Result<Vec<f32>> {
        match self {
            EmbeddingVector::Float(values) => Ok(values.clone()),
            EmbeddingVector::Base64(encoded) => {
                let bytes = STANDARD.decode(encoded).map_err(|e| {
                    Error::invalid_response(format!("Invalid base64 embedding: {}", e), None)
                })?;
                if bytes.len() % 4 != 0 {
                    return Err(Error::invalid_response(
                        format!("Base64 embedding is {} bytes, not a whole number of f32s", bytes.len()),
                        None,
                    ));
                }
                Ok(bytes
                    .chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    #[serde(default = "default_embedding_object")]
    pub object: String,
    pub index: usize,
    pub embedding: EmbeddingVector,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_embedding_object() -> String {
    "embedding".to_string()
}

/// Response of `POST /v1/embeddings`, in the OpenAI shape. Fields this crate
/// does not name are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default = "default_list_object")]
    pub object: String,
    pub data: Vec<Embedding>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: EmbeddingUsage,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_list_object() -> String {
    "list".to_string()
}

impl EmbeddingResponse {
    pub fn first(&self) -> Option<&Embedding> {
        self.data.first()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `openai.embeddings()`.
#[derive(Debug, Clone, Copy)]
pub struct Embeddings<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> Embeddings<'a> {
    pub(crate) fn new(scope: CapabilityScope<'a>) -> Self {
        Self { scope }
    }

    pub async fn create(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.scope
            .transport
            .post(&self.scope.endpoint("/embeddings"), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_serializes_untagged() {
        let req = EmbeddingRequest::single("bge-small", "hello");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"input": "hello", "model": "bge-small"})
        );
        let req = EmbeddingRequest::batch("bge-small", vec!["a".into(), "b".into()]).with_dimensions(384);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["input"], json!(["a", "b"]));
        assert_eq!(body["dimensions"], 384);
    }

    #[test]
    fn responses_keep_the_openai_shape() {
        let body = json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]},
                {"object": "embedding", "index": 1, "embedding": [0.5, 0.25]}
            ],
            "model": "bge-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4},
            "id": "emb-123"
        });
        let resp: EmbeddingResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(resp.len(), 2);
        assert_eq!(resp.first().unwrap().embedding, EmbeddingVector::Float(vec![1.0, 0.0]));
        assert_eq!(resp.usage.total_tokens, 4);
        assert_eq!(serde_json::to_value(&resp).unwrap(), body);
    }

    #[test]
    fn base64_embeddings_decode_to_floats() {
        // 1.0f32 and 2.0f32, little-endian.
        let body = json!({
            "data": [{"index": 0, "embedding": "AACAPwAAAEA="}],
            "model": "bge-small"
        });
        let resp: EmbeddingResponse = serde_json::from_value(body).unwrap();
        let embedding = &resp.data[0].embedding;
        assert_eq!(*embedding, EmbeddingVector::Base64("AACAPwAAAEA=".into()));
        assert_eq!(embedding.to_floats().unwrap(), vec![1.0, 2.0]);

        let err = EmbeddingVector::Base64("AACAPw==AA".into()).to_floats().unwrap_err();
        assert_eq!(err.code(), "INVALID_RESPONSE");
        let err = EmbeddingVector::Base64("AACA".into()).to_floats().unwrap_err();
        assert_eq!(err.code(), "INVALID_RESPONSE");
    }

    #[test]
    fn malformed_embeddings_are_rejected() {
        for body in [
            json!({"model": "x"}),
            json!({"data": [{"index": 0, "embedding": [0.1, "oops"]}]}),
        ] {
            assert!(serde_json::from_value::<EmbeddingResponse>(body).is_err());
        }
    }
}
