//! Image generation client.

use super::types::{GeneratedImage, ImageGenerationOptions, ImageMode, ImageOptions, ImageRequest};
use crate::client::endpoint::CapabilityScope;
use crate::transport::{HttpTransport, ResponsePayload};
use crate::{Error, Result};
use reqwest::Method;

/// Text-to-image generation.
#[derive(Debug, Clone, Copy)]
pub struct ImageCapability<'a> {
    scope: CapabilityScope<'a>,
}

impl<'a> ImageCapability<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            scope: CapabilityScope::new(transport, "/image"),
        }
    }

    /// Generate an image from `prompt`. Unset options fall back to
    /// `standard` mode, 1024x1024 and guidance 7.5.
    pub async fn generate(
        &self,
        prompt: &str,
        options: impl Into<ImageGenerationOptions>,
    ) -> Result<GeneratedImage> {
        let request = ImageRequest::new(prompt, options.into());
        let body = serde_json::to_value(&request)?;
        let payload = self
            .scope
            .transport
            .request(Method::POST, &self.scope.endpoint("/generate"), Some(&body))
            .await?;

        match payload {
            ResponsePayload::Binary { data, .. } => Ok(GeneratedImage { data }),
            ResponsePayload::Json(_) => Err(Error::invalid_response(
                "Image generation returned JSON instead of image data",
                None,
            )),
        }
    }

    /// Generate in `fast` mode. Any mode carried by `options` is discarded.
    pub async fn generate_fast(
        &self,
        prompt: &str,
        options: impl Into<ImageOptions>,
    ) -> Result<GeneratedImage> {
        self.generate(prompt, options.into().with_mode(ImageMode::Fast))
            .await
    }

    /// Generate in `standard` (full quality) mode. Any mode carried by `options` is discarded.
    pub async fn generate_standard(
        &self,
        prompt: &str,
        options: impl Into<ImageOptions>,
    ) -> Result<GeneratedImage> {
        self.generate(prompt, options.into().with_mode(ImageMode::Standard))
            .await
    }
}
