//! Response decoding and error classification.
//!
//! The API wraps some responses in `{success, data, error}` and leaves others bare.
//! Decoding rules:
//! - non-2xx: `{error: {code, message, details}}` if the body is JSON, `REQUEST_FAILED` otherwise
//! - `content-type: image/*`: raw bytes, never parsed
//! - no `success` field: the body is the payload
//! - falsy `success` (`false`, `0`, `""`, `null`): error from the envelope
//! - any other `success`: `data` when present, the body otherwise

use crate::error_code::ErrorCode;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Json(Value),
    Binary { data: Bytes, content_type: String },
}

impl ResponsePayload {
    pub fn into_json(self) -> Result<Value> {
        match self {
            ResponsePayload::Json(v) => Ok(v),
            ResponsePayload::Binary { content_type, .. } => Err(Error::invalid_response(
                format!("Expected a JSON response, got {}", content_type),
                None,
            )),
        }
    }

    /// Deserialize the JSON payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.into_json()?;
        serde_json::from_value(value)
            .map_err(|e| Error::invalid_response(format!("Unexpected response shape: {}", e), None))
    }
}

pub(crate) fn decode_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: Bytes,
) -> Result<ResponsePayload> {
    if !status.is_success() {
        return Err(error_from_body(status.as_u16(), &body));
    }

    if let Some(ct) = content_type {
        if ct.to_ascii_lowercase().contains("image/") {
            return Ok(ResponsePayload::Binary {
                data: body,
                content_type: ct.to_string(),
            });
        }
    }

    // Void endpoints (deletes) may answer with an empty body.
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponsePayload::Json(Value::Null));
    }

    let data: Value = serde_json::from_slice(&body).map_err(|e| {
        Error::network_with_context(
            format!("Malformed response body: {}", e),
            ErrorContext::new()
                .with_source("transport")
                .with_details(format!("HTTP {}", status.as_u16())),
        )
    })?;

    unwrap_envelope(data).map(ResponsePayload::Json)
}

/// Classify a non-2xx response body.
pub(crate) fn error_from_body(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => error_from_envelope(&value, Some(status)),
        Err(_) => Error::api(
            ErrorCode::RequestFailed,
            "API request failed",
            Some(status),
            None,
        ),
    }
}

pub(crate) fn error_from_envelope(value: &Value, status: Option<u16>) -> Error {
    let error = value.get("error");
    let code = error
        .and_then(|e| e.get("code"))
        .and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| ErrorCode::UnknownError.to_string());
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");
    let details = error
        .and_then(|e| e.get("details"))
        .filter(|d| !d.is_null())
        .cloned();
    Error::api(code, message, status, details)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn unwrap_envelope(body: Value) -> Result<Value> {
    let Some(flag) = body.get("success") else {
        return Ok(body);
    };

    if !is_truthy(flag) {
        return Err(error_from_envelope(&body, None));
    }

    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => Ok(data),
            _ => Ok(Value::Object(map)),
        },
        other => Ok(other),
    }
}
