//! Client-side error codes.
//!
//! Errors reported by the API carry the server's own `code` string verbatim.
//! Everything the client itself detects is tagged with one of the codes below.
//!
//! | Code                  | Raised when                                                   |
//! |-----------------------|---------------------------------------------------------------|
//! | `REQUEST_FAILED`      | non-2xx response whose body is not JSON                       |
//! | `UNKNOWN_ERROR`       | error envelope without a `code`                               |
//! | `NETWORK_ERROR`       | no response, unreadable body, or malformed success JSON       |
//! | `INDEX_NOT_FOUND`     | consistent `add_vectors` against a missing index              |
//! | `INVALID_RESPONSE`    | success response with an unexpected shape                     |
//! | `CONFIGURATION_ERROR` | the client could not be built                                  |
//! | `SERIALIZATION_ERROR` | a request body could not be encoded                            |
//!
//! ## Example
//!
//! ```rust
//! use neuredge::error_code::ErrorCode;
//!
//! let code = ErrorCode::from_code("INDEX_NOT_FOUND").unwrap();
//! assert_eq!(code, ErrorCode::IndexNotFound);
//! assert_eq!(code.as_str(), "INDEX_NOT_FOUND");
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RequestFailed,
    UnknownError,
    NetworkError,
    IndexNotFound,
    InvalidResponse,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Returns the canonical code string (e.g., `"NETWORK_ERROR"`).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestFailed => "REQUEST_FAILED",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::IndexNotFound => "INDEX_NOT_FOUND",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
        }
    }

    /// Maps a code string back to a client-side code. Server-defined codes return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = match code {
            "REQUEST_FAILED" => Self::RequestFailed,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "NETWORK_ERROR" => Self::NetworkError,
            "INDEX_NOT_FOUND" => Self::IndexNotFound,
            "INVALID_RESPONSE" => Self::InvalidResponse,
            "CONFIGURATION_ERROR" => Self::ConfigurationError,
            "SERIALIZATION_ERROR" => Self::SerializationError,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}
