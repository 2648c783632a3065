use super::streaming::ChatCompletionStream;
use super::types::{ChatCompletion, ChatCompletionRequest};
use crate::client::endpoint::CapabilityScope;
use crate::Result;
use tracing::debug;

/// `openai.chat()`.
#[derive(Debug, Clone, Copy)]
pub struct Chat<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> Chat<'a> {
    pub(crate) fn new(scope: CapabilityScope<'a>) -> Self {
        Self { scope }
    }

    pub fn completions(&self) -> ChatCompletions<'a> {
        ChatCompletions { scope: self.scope }
    }
}

/// `openai.chat().completions()`.
#[derive(Debug, Clone, Copy)]
pub struct ChatCompletions<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> ChatCompletions<'a> {
    /// Buffered completion. `stream` is forced off.
    pub async fn create(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        let mut body = serde_json::to_value(request)?;
        body["stream"] = false.into();
        self.scope
            .transport
            .post(&self.scope.endpoint("/chat/completions"), &body)
            .await
    }

    /// Streamed completion. `stream` is forced on.
    ///
    /// Errors before the first byte (auth, bad request) are returned here; errors
    /// after that arrive as items of the stream. Nothing is retried.
    pub async fn create_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionStream> {
        let mut body = serde_json::to_value(request)?;
        body["stream"] = true.into();
        debug!(model = %request.model, "opening completion stream");
        let bytes = self
            .scope
            .transport
            .execute_stream(&self.scope.endpoint("/chat/completions"), &body)
            .await?;
        Ok(ChatCompletionStream::new(bytes))
    }
}
