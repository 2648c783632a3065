//! Server-sent-events decoding for streamed completions.

use super::types::ChatCompletionChunk;
use crate::transport::error_from_envelope;
use crate::{BoxStream, Error, Result};
use bytes::{Bytes, BytesMut};
use futures::{stream, Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};

const DONE_SIGNAL: &str = "[DONE]";

/// Split an SSE byte stream into JSON payloads.
///
/// Frames are separated by a blank line; `data:` prefixes are stripped, comment
/// frames and non-JSON frames are skipped, and `[DONE]` ends the stream. A frame
/// carrying an `error` object ends up as an error item.
///
/// Bytes are buffered raw and only complete frames are decoded as UTF-8, so a
/// character split across network reads survives intact.
pub(crate) fn decode_sse(input: BoxStream<'static, Bytes>) -> BoxStream<'static, Value> {
    let stream = stream::unfold(
        (input, BytesMut::new(), false),
        |(mut input, mut buf, done)| async move {
            if done {
                return None;
            }
            loop {
                if let Some((idx, delimiter_len)) = find_frame_end(&buf) {
                    let frame = buf.split_to(idx + delimiter_len);

                    match parse_frame(&frame[..idx]) {
                        Frame::Done => return None,
                        Frame::Skip => continue,
                        Frame::Payload(v) => return Some((payload_item(v), (input, buf, false))),
                    }
                }

                match input.next().await {
                    Some(Ok(bytes)) => buf.extend_from_slice(&bytes),
                    Some(Err(e)) => return Some((Err(e), (input, buf, true))),
                    None => {
                        // EOF: the last frame may lack its trailing blank line.
                        let rest = buf.split();
                        return match parse_frame(&rest) {
                            Frame::Payload(v) => Some((payload_item(v), (input, buf, true))),
                            Frame::Done | Frame::Skip => None,
                        };
                    }
                }
            }
        },
    );
    Box::pin(stream)
}

enum Frame {
    Done,
    Skip,
    Payload(Value),
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn find_frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = find_bytes(buf, b"\n\n").map(|i| (i, 2));
    let crlf = find_bytes(buf, b"\r\n\r\n").map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_frame(frame: &[u8]) -> Frame {
    let frame = String::from_utf8_lossy(frame);
    let mut data = String::new();
    for line in frame.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        if let Some(payload) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(payload.trim_start());
        }
        // event:, id:, retry: lines carry nothing the chunk decoder needs.
    }

    let data = data.trim();
    if data.is_empty() {
        return Frame::Skip;
    }
    if data == DONE_SIGNAL {
        return Frame::Done;
    }
    match serde_json::from_str(data) {
        Ok(v) => Frame::Payload(v),
        Err(_) => Frame::Skip,
    }
}

fn payload_item(v: Value) -> Result<Value> {
    match v.get("error") {
        Some(err) if err.is_object() => Err(error_from_envelope(&v, None)),
        _ => Ok(v),
    }
}

/// Streamed chat completion.
///
/// Lazy and single-use: chunks are read off the connection as they are polled,
/// and the stream ends when the server sends `[DONE]` or closes. It cannot be
/// restarted; issue a new request instead.
pub struct ChatCompletionStream {
    inner: BoxStream<'static, ChatCompletionChunk>,
}

impl ChatCompletionStream {
    pub(crate) fn new(bytes: BoxStream<'static, Bytes>) -> Self {
        let inner = decode_sse(bytes).map(|item| {
            item.and_then(|value| {
                serde_json::from_value::<ChatCompletionChunk>(value).map_err(|e| {
                    Error::invalid_response(format!("Invalid completion chunk: {}", e), None)
                })
            })
        });
        Self {
            inner: Box::pin(inner),
        }
    }

    /// Drain the stream, concatenating the delta text of the first choice.
    pub async fn collect_content(mut self) -> Result<String> {
        let mut content = String::new();
        while let Some(chunk) = self.next().await {
            if let Some(text) = chunk?.content() {
                content.push_str(text);
            }
        }
        Ok(content)
    }
}

impl Stream for ChatCompletionStream {
    type Item = Result<ChatCompletionChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for ChatCompletionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;

    fn bytes_of(parts: &[&'static str]) -> BoxStream<'static, Bytes> {
        let items: Vec<Result<Bytes>> = parts
            .iter()
            .map(|p| Ok(Bytes::from_static(p.as_bytes())))
            .collect();
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn frames_split_across_chunks_are_reassembled() {
        let input = bytes_of(&[
            "data: {\"a\":",
            "1}\n\n: keep-alive\n\ndata: not json\n\n",
            "event: message\r\ndata: {\"a\":2}\r\n\r\n",
            "data: [DONE]\n\ndata: {\"a\":3}\n\n",
        ]);
        let values: Vec<Value> = decode_sse(input).try_collect().await.unwrap();
        assert_eq!(values, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[tokio::test]
    async fn trailing_frame_without_delimiter_is_emitted() {
        let input = bytes_of(&["data: {\"a\":1}\n\ndata: {\"a\":2}"]);
        let values: Vec<Value> = decode_sse(input).try_collect().await.unwrap();
        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn error_frames_become_errors() {
        let input = bytes_of(&[
            "data: {\"a\":1}\n\n",
            "data: {\"error\":{\"code\":\"rate_limited\",\"message\":\"slow down\"}}\n\n",
        ]);
        let mut values = decode_sse(input);
        assert!(values.next().await.unwrap().is_ok());
        let err = values.next().await.unwrap().unwrap_err();
        assert_eq!(err.code(), "rate_limited");
        assert_eq!(err.message(), "slow down");
    }

    #[tokio::test]
    async fn transport_errors_end_the_stream() {
        let items: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: {\"a\":1}\n\n")),
            Err(Error::network("connection reset")),
            Ok(Bytes::from_static(b"data: {\"a\":2}\n\n")),
        ];
        let mut values = decode_sse(Box::pin(stream::iter(items)));
        assert!(values.next().await.unwrap().is_ok());
        assert_eq!(values.next().await.unwrap().unwrap_err().code(), "NETWORK_ERROR");
        assert!(values.next().await.is_none());
    }

    #[tokio::test]
    async fn collect_content_concatenates_deltas() {
        let input = bytes_of(&[
            "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        let content = ChatCompletionStream::new(input).collect_content().await.unwrap();
        assert_eq!(content, "Hello");
    }

    #[tokio::test]
    async fn multibyte_characters_split_across_reads_survive() {
        let frame = "data: {\"choices\":[{\"delta\":{\"content\":\"caf\u{e9} \u{732b}\"}}]}\n\n".as_bytes();
        // Cut inside the two-byte "é" and again inside the three-byte "猫".
        let e_acute = frame.iter().position(|b| *b == 0xC3).unwrap();
        let cat = frame.iter().position(|b| *b == 0xE7).unwrap();
        let items: Vec<Result<Bytes>> = vec![
            Ok(Bytes::copy_from_slice(&frame[..=e_acute])),
            Ok(Bytes::copy_from_slice(&frame[e_acute + 1..cat + 2])),
            Ok(Bytes::copy_from_slice(&frame[cat + 2..])),
        ];

        let content = ChatCompletionStream::new(Box::pin(stream::iter(items)))
            .collect_content()
            .await
            .unwrap();
        assert_eq!(content, "caf\u{e9} \u{732b}");
    }
}
