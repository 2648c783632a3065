//! Text analysis client.

use super::types::{
    LanguageCode, SentimentResult, SummaryResult, TranslateRequest, TranslationResult,
};
use crate::client::endpoint::CapabilityScope;
use crate::transport::HttpTransport;
use crate::types::ApiResponse;
use crate::Result;
use serde_json::json;

/// Summarization, translation and sentiment analysis.
#[derive(Debug, Clone, Copy)]
pub struct TextCapability<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> TextCapability<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            scope: CapabilityScope::new(transport, ""),
        }
    }

    /// Generate a concise summary of `text`.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        Ok(self.summarize_detailed(text).await?.result.summary)
    }

    /// Like [`summarize`](Self::summarize), keeping compression metadata, usage and quota.
    pub async fn summarize_detailed(&self, text: &str) -> Result<ApiResponse<SummaryResult>> {
        self.scope
            .transport
            .post(&self.scope.endpoint("/summarize"), &json!({ "text": text }))
            .await
    }

    /// Translate `text` into `target_lang`. The source language is auto-detected
    /// unless `source_lang` is given.
    pub async fn translate(
        &self,
        text: &str,
        target_lang: LanguageCode,
        source_lang: Option<LanguageCode>,
    ) -> Result<String> {
        Ok(self
            .translate_detailed(text, target_lang, source_lang)
            .await?
            .result
            .translation)
    }

    pub async fn translate_detailed(
        &self,
        text: &str,
        target_lang: LanguageCode,
        source_lang: Option<LanguageCode>,
    ) -> Result<ApiResponse<TranslationResult>> {
        let body = TranslateRequest {
            text,
            target_lang,
            source_lang,
        };
        self.scope
            .transport
            .post(&self.scope.endpoint("/translate"), &body)
            .await
    }

    pub async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult> {
        let response: ApiResponse<SentimentResult> = self
            .scope
            .transport
            .post(&self.scope.endpoint("/sentiment"), &json!({ "text": text }))
            .await?;
        Ok(response.into_result())
    }
}
