use crate::client::builder::NeuredgeBuilder;
use crate::image::ImageCapability;
use crate::openai::OpenAiProxy;
use crate::text::TextCapability;
use crate::transport::HttpTransport;
use crate::vector::VectorStore;
use crate::Result;
use std::sync::Arc;

/// Entry point to every Neuredge capability.
///
/// One transport is shared by all capability groups; each accessor hands out a
/// lightweight view borrowing it. Cloning the client is cheap and clones share the
/// same connection pool.
#[derive(Debug, Clone)]
pub struct Neuredge {
    transport: Arc<HttpTransport>,
}

impl Neuredge {
    /// Create a client for the default base URL.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        NeuredgeBuilder::new().api_key(api_key).build()
    }

    /// Create a client configured entirely from `NEUREDGE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        NeuredgeBuilder::new().build()
    }

    pub fn builder() -> NeuredgeBuilder {
        NeuredgeBuilder::new()
    }

    pub(crate) fn from_transport(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Summarization, translation and sentiment analysis.
    pub fn text(&self) -> TextCapability<'_> {
        TextCapability::new(&self.transport)
    }

    /// Text-to-image generation.
    pub fn image(&self) -> ImageCapability<'_> {
        ImageCapability::new(&self.transport)
    }

    /// Vector indexes, vector writes and similarity search.
    pub fn vector(&self) -> VectorStore<'_> {
        VectorStore::new(&self.transport)
    }

    /// OpenAI-compatible chat completions and embeddings.
    pub fn openai(&self) -> OpenAiProxy<'_> {
        OpenAiProxy::new(&self.transport)
    }

    pub fn api_key(&self) -> &str {
        self.transport.api_key()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }
}
