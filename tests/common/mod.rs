//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use neuredge::Neuredge;
use serde_json::Value;

pub const API_KEY: &str = "nrkey_test";

/// Test fixture that owns a mock server and a client pointed at it.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub client: Neuredge,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        init_tracing();
        let server = Server::new_async().await;
        let client = Neuredge::builder()
            .api_key(API_KEY)
            .base_url(server.url())
            .build()
            .expect("client builds against mock server");
        Self { server, client }
    }

    /// Mock a JSON response for `method path`, requiring the bearer token.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: Value) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Like [`mock_json`](Self::mock_json), but only for requests whose JSON body
    /// contains `expected_body`, and expecting exactly `hits` calls.
    pub async fn mock_json_matching(
        &mut self,
        method: &str,
        path: &str,
        expected_body: Value,
        body: Value,
        hits: usize,
    ) -> Mock {
        self.server
            .mock(method, path)
            .match_body(Matcher::PartialJson(expected_body))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create_async()
            .await
    }

    /// Mock a streamed (SSE) response. Each chunk becomes one `data:` frame.
    pub async fn mock_sse_stream(&mut self, path: &str, chunks: &[&str]) -> Mock {
        let body = chunks
            .iter()
            .map(|chunk| format!("data: {}\n\n", chunk))
            .collect::<String>();
        self.server
            .mock("POST", path)
            .match_body(Matcher::PartialJson(serde_json::json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
