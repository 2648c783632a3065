use crate::client::core::Neuredge;
use crate::transport::{HttpTransport, TransportConfig, DEFAULT_TIMEOUT};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.neuredge.dev";

/// Builder for creating clients with custom configuration.
///
/// Anything left unset falls back to the environment:
/// - `NEUREDGE_API_KEY` (required when no key is given)
/// - `NEUREDGE_BASE_URL` (default `https://api.neuredge.dev`)
/// - `NEUREDGE_HTTP_TIMEOUT_SECS` (default 30)
/// - `NEUREDGE_PROXY_URL`
#[derive(Debug, Default)]
pub struct NeuredgeBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    proxy_url: Option<String>,
}

impl NeuredgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL. Trailing slashes are stripped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout applied by the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn build(self) -> Result<Neuredge> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("NEUREDGE_API_KEY").ok())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required (NEUREDGE_API_KEY)",
                    ErrorContext::new()
                        .with_field_path("api_key")
                        .with_source("builder"),
                )
            })?;

        let base_url = self
            .base_url
            .or_else(|| std::env::var("NEUREDGE_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let timeout = self.timeout.unwrap_or_else(|| {
            std::env::var("NEUREDGE_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT)
        });

        let proxy_url = self
            .proxy_url
            .or_else(|| std::env::var("NEUREDGE_PROXY_URL").ok());

        let transport = HttpTransport::new(TransportConfig {
            api_key,
            base_url,
            timeout,
            proxy_url,
        })?;

        Ok(Neuredge::from_transport(Arc::new(transport)))
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    url::Url::parse(trimmed).map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid base URL '{}': {}", raw, e),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_source("builder"),
        )
    })?;
    Ok(trimmed.to_string())
}
