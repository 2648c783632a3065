use super::envelope::{decode_response, error_from_body, ResponsePayload};
use crate::{BoxStream, Error, ErrorContext, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Proxy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Correlation id attached to every request. The API may ignore it; applications can log it.
const REQUEST_ID_HEADER: &str = "x-neuredge-request-id";

/// Settings needed to open a transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub proxy_url: Option<String>,
}

/// Authenticated HTTP transport shared by every capability.
///
/// Holds only immutable state (`api_key`, `base_url`, a pooled client), so it is
/// safe to share across concurrent calls without locking.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_source("transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("transport"),
            )
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, method: Method, endpoint: &str) -> (reqwest::RequestBuilder, String) {
        let url = format!("{}{}", self.base_url, endpoint);
        let request_id = Uuid::new_v4().to_string();
        debug!(%method, %url, %request_id, "sending request");
        let req = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);
        (req, url)
    }

    /// Send one request and decode its response.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ResponsePayload> {
        let (mut req, url) = self.authorized(method, endpoint);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| network_error(e, &url))?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|e| network_error(e, &url))?;

        debug!(%url, status = status.as_u16(), bytes = bytes.len(), "received response");
        decode_response(status, content_type.as_deref(), bytes)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request(Method::GET, endpoint, None).await?.decode()
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, Some(&body))
            .await?
            .decode()
    }

    /// `DELETE`, optionally with a JSON body (bulk vector deletion sends the id list).
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        self.request(Method::DELETE, endpoint, body).await?.decode()
    }

    /// POST a JSON body and hand back the raw byte stream of a server-sent-events response.
    ///
    /// Non-2xx responses are classified exactly like [`HttpTransport::request`].
    pub async fn execute_stream(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<BoxStream<'static, Bytes>> {
        let (req, url) = self.authorized(Method::POST, endpoint);
        let response = req
            .header(ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await
            .map_err(|e| network_error(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        let byte_stream = response
            .bytes_stream()
            .map_err(move |e| network_error(e, &url));
        Ok(Box::pin(byte_stream))
    }
}

fn network_error(e: reqwest::Error, url: &str) -> Error {
    Error::network_with_context(
        e.to_string(),
        ErrorContext::new()
            .with_field_path(url)
            .with_source("transport"),
    )
}
