//! # neuredge
//!
//! Typed async client for the Neuredge AI services API.
//!
//! ## Overview
//!
//! One [`Neuredge`] client exposes four capability groups over a single shared
//! HTTP transport:
//!
//! - **Text**: summarization, translation and sentiment analysis
//! - **Image**: text-to-image generation returning raw image bytes
//! - **Vector**: index management, vector writes and similarity search, with an
//!   opt-in consistency mode for the eventually consistent backing index
//! - **OpenAI**: OpenAI-compatible chat completions (buffered or SSE-streamed) and embeddings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neuredge::vector::{ConsistencyOptions, Metric, Vector, VectorIndex, VectorOptions};
//! use neuredge::Neuredge;
//!
//! #[tokio::main]
//! async fn main() -> neuredge::Result<()> {
//!     let client = Neuredge::new("your-api-key")?;
//!
//!     let summary = client.text().summarize("A long article ...").await?;
//!     println!("{summary}");
//!
//!     let vectors = client.vector();
//!     vectors
//!         .create_index(&VectorIndex::new("docs", 4, Metric::Cosine))
//!         .await?;
//!
//!     let options = VectorOptions::new().with_consistency(ConsistencyOptions::enabled());
//!     vectors
//!         .add_vectors("docs", &[Vector::new("a", vec![0.0, 0.0, 0.0, 1.0])], &options)
//!         .await?;
//!
//!     let matches = vectors
//!         .search_vector("docs", &[0.0, 0.0, 0.0, 1.0], &options.with_top_k(5))
//!         .await?;
//!     println!("{matches:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The [`Neuredge`] facade and its builder |
//! | [`transport`] | Authenticated HTTP transport and response envelope decoding |
//! | [`text`] | Text capability |
//! | [`image`] | Image capability |
//! | [`vector`] | Vector store capability and consistency retry loops |
//! | [`openai`] | OpenAI-compatible proxy |
//! | [`types`] | Envelope types shared across capabilities |
//! | [`error_code`] | Client-side error codes |

pub mod client;
pub mod error;
pub mod error_code;
pub mod image;
pub mod openai;
pub mod text;
pub mod transport;
pub mod types;
pub mod vector;

pub use client::{Neuredge, NeuredgeBuilder};
pub use error::{Error, ErrorContext};
pub use error_code::ErrorCode;

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of results.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;
