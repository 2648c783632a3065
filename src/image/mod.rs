//! Image capability: text-to-image generation.

mod client;
mod types;

pub use client::ImageCapability;
pub use types::{
    GeneratedImage, ImageGenerationOptions, ImageMode, ImageOptions, DEFAULT_GUIDANCE,
    DEFAULT_HEIGHT, DEFAULT_WIDTH, IMAGE_MIME_TYPE,
};
