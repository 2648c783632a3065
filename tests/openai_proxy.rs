//! OpenAI-compatible proxy: buffered and streamed chat completions, embeddings.

mod common;

use common::MockServerFixture;
use futures::StreamExt;
use mockito::Matcher;
use neuredge::openai::{
    ChatCompletionRequest, ChatMessage, EmbeddingRequest, EmbeddingVector, Role,
};
use serde_json::json;

fn haiku_request() -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        "@cf/meta/llama-3.1-8b-instruct",
        vec![
            ChatMessage::system("You are a poet."),
            ChatMessage::user("Write a haiku about the sea"),
        ],
    )
    .max_tokens(64)
}

#[tokio::test]
async fn buffered_completion_forces_stream_off() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .mock_json_matching(
            "POST",
            "/v1/chat/completions",
            json!({"stream": false, "max_tokens": 64, "model": "@cf/meta/llama-3.1-8b-instruct"}),
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "@cf/meta/llama-3.1-8b-instruct",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Waves fold into foam"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
            }),
            1,
        )
        .await;

    let completion = fx
        .client
        .openai()
        .chat()
        .completions()
        .create(&haiku_request())
        .await
        .unwrap();

    assert_eq!(completion.content(), Some("Waves fold into foam"));
    assert_eq!(completion.choices[0].message.role, Role::Assistant);
    assert_eq!(completion.usage.unwrap().total_tokens, 17);
    assert_eq!(completion.extra["object"], "chat.completion");
    mock.assert_async().await;
}

#[tokio::test]
async fn streamed_completion_yields_chunks_until_done() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .mock_sse_stream(
            "/v1/chat/completions",
            &[
                r#"{"id":"c1","choices":[{"index":0,"delta":{"role":"assistant"}}]}"#,
                r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Waves "}}]}"#,
                r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"fold"},"finish_reason":"stop"}]}"#,
                "[DONE]",
            ],
        )
        .await;

    let mut stream = fx
        .client
        .openai()
        .chat()
        .completions()
        .create_stream(&haiku_request())
        .await
        .unwrap();

    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next().await {
        chunks.push(chunk.unwrap());
    }
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].choices[0].delta.role, Some(Role::Assistant));
    assert_eq!(chunks[2].choices[0].finish_reason.as_deref(), Some("stop"));
    mock.assert_async().await;
}

#[tokio::test]
async fn collect_content_drains_the_stream() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_sse_stream(
        "/v1/chat/completions",
        &[
            r#"{"choices":[{"delta":{"content":"Hello"}}]}"#,
            r#"{"choices":[{"delta":{"content":", world"}}]}"#,
            "[DONE]",
        ],
    )
    .await;

    let content = fx
        .client
        .openai()
        .chat()
        .completions()
        .create_stream(&haiku_request())
        .await
        .unwrap()
        .collect_content()
        .await
        .unwrap();
    assert_eq!(content, "Hello, world");
}

#[tokio::test]
async fn stream_rejected_upfront_returns_the_error() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_json(
        "POST",
        "/v1/chat/completions",
        401,
        json!({"error": {"code": "UNAUTHORIZED", "message": "bad key"}}),
    )
    .await;

    let err = fx
        .client
        .openai()
        .chat()
        .completions()
        .create_stream(&haiku_request())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNAUTHORIZED");
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn error_frames_surface_as_stream_items() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_sse_stream(
        "/v1/chat/completions",
        &[
            r#"{"choices":[{"delta":{"content":"Hi"}}]}"#,
            r#"{"error":{"code":"model_overloaded","message":"try later"}}"#,
        ],
    )
    .await;

    let err = fx
        .client
        .openai()
        .chat()
        .completions()
        .create_stream(&haiku_request())
        .await
        .unwrap()
        .collect_content()
        .await
        .unwrap_err();
    assert_eq!(err.code(), "model_overloaded");
}

#[tokio::test]
async fn embeddings_keep_the_openai_shape() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .server
        .mock("POST", "/v1/embeddings")
        .match_body(Matcher::Json(
            json!({"input": ["first", "second"], "model": "@cf/baai/bge-small-en-v1.5"}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "object": "list",
                "data": [
                    {"object": "embedding", "index": 0, "embedding": [0.5, 0.25, 0.125]},
                    {"object": "embedding", "index": 1, "embedding": [1.0, 0.0, -1.0]}
                ],
                "model": "@cf/baai/bge-small-en-v1.5",
                "usage": {"prompt_tokens": 6, "total_tokens": 6},
                "shape": [2, 3]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = EmbeddingRequest::batch(
        "@cf/baai/bge-small-en-v1.5",
        vec!["first".to_string(), "second".to_string()],
    );
    let response = fx
        .client
        .openai()
        .embeddings()
        .create(&request)
        .await
        .unwrap();

    assert_eq!(response.object, "list");
    assert_eq!(response.len(), 2);
    assert_eq!(response.data[1].index, 1);
    assert_eq!(response.data[1].object, "embedding");
    assert_eq!(
        response.first().unwrap().embedding,
        EmbeddingVector::Float(vec![0.5, 0.25, 0.125])
    );
    assert_eq!(response.usage.prompt_tokens, 6);
    assert_eq!(response.extra["shape"], json!([2, 3]));
    mock.assert_async().await;
}

#[tokio::test]
async fn base64_embeddings_are_returned_undecoded() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .mock_json_matching(
            "POST",
            "/v1/embeddings",
            json!({"encoding_format": "base64"}),
            json!({
                "object": "list",
                "data": [{"object": "embedding", "index": 0, "embedding": "AACAPwAAAEA="}],
                "model": "@cf/baai/bge-small-en-v1.5",
                "usage": {"prompt_tokens": 1, "total_tokens": 1}
            }),
            1,
        )
        .await;

    let request = EmbeddingRequest::single("@cf/baai/bge-small-en-v1.5", "hi")
        .with_encoding_format("base64");
    let response = fx
        .client
        .openai()
        .embeddings()
        .create(&request)
        .await
        .unwrap();

    let embedding = &response.data[0].embedding;
    assert_eq!(*embedding, EmbeddingVector::Base64("AACAPwAAAEA=".to_string()));
    assert_eq!(embedding.to_floats().unwrap(), vec![1.0, 2.0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_embeddings_are_invalid_responses() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_json(
        "POST",
        "/v1/embeddings",
        200,
        json!({"data": [{"index": 0, "embedding": [0.1, "oops"]}], "model": "m"}),
    )
    .await;

    let err = fx
        .client
        .openai()
        .embeddings()
        .create(&EmbeddingRequest::single("m", "hi"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_RESPONSE");
}

#[tokio::test]
async fn chunked_stream_keeps_multibyte_text_intact() {
    use std::io::Write;

    let mut fx = MockServerFixture::new().await;
    let frame = "data: {\"choices\":[{\"delta\":{\"content\":\"caf\u{e9} \u{732b}\"}}]}\n\ndata: [DONE]\n\n";
    let split = frame.as_bytes().iter().position(|b| *b == 0xC3).unwrap() + 1;
    fx.server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_chunked_body(move |w| {
            w.write_all(&frame.as_bytes()[..split])?;
            w.flush()?;
            w.write_all(&frame.as_bytes()[split..])
        })
        .create_async()
        .await;

    let content = fx
        .client
        .openai()
        .chat()
        .completions()
        .create_stream(&haiku_request())
        .await
        .unwrap()
        .collect_content()
        .await
        .unwrap();
    assert_eq!(content, "caf\u{e9} \u{732b}");
}
