//! Transport behavior observed through the public client: auth, envelope
//! handling and error classification.

mod common;

use common::MockServerFixture;
use neuredge::vector::VectorId;
use neuredge::Neuredge;
use serde_json::{json, Value};

#[tokio::test]
async fn bare_bodies_pass_through_and_carry_bearer_auth() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .mock_json(
            "GET",
            "/v1/indexes",
            200,
            json!({"indexes": [{"name": "docs", "dimension": 3, "vector_count": 2}]}),
        )
        .await;

    let indexes = fx.client.vector().list_indexes().await.unwrap();
    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].name, "docs");
    mock.assert_async().await;
}

#[tokio::test]
async fn request_id_header_is_sent() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .server
        .mock("GET", "/v1/indexes")
        .match_header("x-neuredge-request-id", mockito::Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    fx.client.vector().list_indexes().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_envelope_raises_the_server_code() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_json(
        "POST",
        "/summarize",
        200,
        json!({"success": false, "error": {"code": "X", "message": "quota exceeded", "details": {"limit": 10}}}),
    )
    .await;

    let err = fx.client.text().summarize("long text").await.unwrap_err();
    assert_eq!(err.code(), "X");
    assert_eq!(err.message(), "quota exceeded");
    assert_eq!(err.details(), Some(&json!({"limit": 10})));
}

#[tokio::test]
async fn unparseable_error_body_is_request_failed() {
    let mut fx = MockServerFixture::new().await;
    fx.server
        .mock("POST", "/summarize")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = fx.client.text().summarize("text").await.unwrap_err();
    assert_eq!(err.code(), "REQUEST_FAILED");
    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn codeless_error_body_is_unknown_error() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_json("POST", "/sentiment", 400, json!({"error": {}}))
        .await;

    let err = fx.client.text().analyze_sentiment("meh").await.unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_ERROR");
    assert_eq!(err.message(), "Unknown error");
    assert_eq!(err.status_code(), Some(400));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    common::init_tracing();
    let client = Neuredge::builder()
        .api_key("nrkey_test")
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = client.vector().list_indexes().await.unwrap_err();
    assert_eq!(err.code(), "NETWORK_ERROR");
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn malformed_success_body_is_network_error() {
    let mut fx = MockServerFixture::new().await;
    fx.server
        .mock("GET", "/v1/indexes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"indexes\": [")
        .create_async()
        .await;

    let err = fx.client.vector().list_indexes().await.unwrap_err();
    assert_eq!(err.code(), "NETWORK_ERROR");
}

#[tokio::test]
async fn delete_carries_a_json_body() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .server
        .mock("DELETE", "/v1/indexes/docs/vectors")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({"ids": ["a", 7]})))
        .with_status(200)
        .with_body(Value::Null.to_string())
        .create_async()
        .await;

    fx.client
        .vector()
        .delete_vectors("docs", &[VectorId::from("a"), VectorId::from(7i64)])
        .await
        .unwrap();
    mock.assert_async().await;
}
