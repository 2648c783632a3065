//! OpenAI-compatible proxy: chat completions (buffered or streamed) and embeddings,
//! served under `/v1`.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use neuredge::openai::{ChatCompletionRequest, ChatMessage};
//!
//! # async fn run(client: neuredge::Neuredge) -> neuredge::Result<()> {
//! let request = ChatCompletionRequest::new(
//!     "@cf/meta/llama-3.1-8b-instruct",
//!     vec![ChatMessage::user("Write a haiku about the sea")],
//! );
//! let mut stream = client.openai().chat().completions().create_stream(&request).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.content().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

mod chat;
mod embeddings;
mod streaming;
mod types;

pub use chat::{Chat, ChatCompletions};
pub use embeddings::{
    Embedding, EmbeddingInput, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
    EmbeddingVector, Embeddings,
};
pub use streaming::ChatCompletionStream;
pub use types::{
    ChatChoice, ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ChatMessage,
    ChunkChoice, ChunkDelta, CompletionUsage, Role,
};

use crate::client::endpoint::CapabilityScope;
use crate::transport::HttpTransport;

#[derive(Debug, Clone, Copy)]
pub struct OpenAiProxy<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> OpenAiProxy<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            scope: CapabilityScope::new(transport, "/v1"),
        }
    }

    pub fn chat(&self) -> Chat<'a> {
        Chat::new(self.scope)
    }

    pub fn embeddings(&self) -> Embeddings<'a> {
        Embeddings::new(self.scope)
    }
}
