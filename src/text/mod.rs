//! Text capability: summarization, translation and sentiment analysis.

mod client;
mod types;

pub use client::TextCapability;
pub use types::{
    LanguageCode, Sentiment, SentimentResult, SummaryMetadata, SummaryResult, TranslationResult,
};
