//! Image generation types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 1024;
pub const DEFAULT_GUIDANCE: f32 = 7.5;

/// Media type reported for every generated image.
pub const IMAGE_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    Fast,
    #[default]
    Standard,
}

/// Generation options without a mode, for calls that fix the mode themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageOptions {
    /// Things to avoid in the image.
    pub negative_prompt: Option<String>,
    /// 512-1024, default 1024.
    pub width: Option<u32>,
    /// 512-1024, default 1024.
    pub height: Option<u32>,
    /// How closely to follow the prompt (1-20), default 7.5.
    pub guidance: Option<f32>,
    /// Seed for reproducible results.
    pub seed: Option<u64>,
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn guidance(mut self, guidance: f32) -> Self {
        self.guidance = Some(guidance);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mode(self, mode: ImageMode) -> ImageGenerationOptions {
        ImageGenerationOptions {
            mode: Some(mode),
            options: self,
        }
    }
}

/// Full generation options, including the mode (default `standard`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageGenerationOptions {
    pub mode: Option<ImageMode>,
    pub options: ImageOptions,
}

impl From<ImageOptions> for ImageGenerationOptions {
    fn from(options: ImageOptions) -> Self {
        Self {
            mode: None,
            options,
        }
    }
}

/// Dropping down to [`ImageOptions`] discards the mode, so mode-fixed calls
/// cannot be overridden by the caller.
impl From<ImageGenerationOptions> for ImageOptions {
    fn from(options: ImageGenerationOptions) -> Self {
        options.options
    }
}

/// Body of `/image/generate` after defaults are applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ImageRequest<'a> {
    pub prompt: &'a str,
    pub mode: ImageMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub width: u32,
    pub height: u32,
    pub guidance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl<'a> ImageRequest<'a> {
    pub fn new(prompt: &'a str, options: ImageGenerationOptions) -> Self {
        let ImageGenerationOptions { mode, options } = options;
        Self {
            prompt,
            mode: mode.unwrap_or_default(),
            negative_prompt: options.negative_prompt,
            width: options.width.unwrap_or(DEFAULT_WIDTH),
            height: options.height.unwrap_or(DEFAULT_HEIGHT),
            guidance: options.guidance.unwrap_or(DEFAULT_GUIDANCE),
            seed: options.seed,
        }
    }
}

/// A generated image.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub data: Bytes,
}

impl GeneratedImage {
    pub fn mime_type(&self) -> &'static str {
        IMAGE_MIME_TYPE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
