use crate::error_code::ErrorCode;
use serde_json::Value;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or request target that caused the error (e.g., "base_url", "/v1/indexes/docs")
    pub field_path: Option<String>,
    /// Additional context about the error
    pub details: Option<String>,
    /// Source of the error (e.g., "transport", "builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the Neuredge client.
///
/// Every variant maps onto a single wire-level error `code` (see [`Error::code`]),
/// so callers can branch on the code regardless of where the failure happened.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by (or derived from) an API response.
    #[error("{message} [{code}]{}", format_status(.status_code))]
    Api {
        code: String,
        message: String,
        status_code: Option<u16>,
        details: Option<Value>,
    },

    /// No usable response was obtained (connection failure, unreadable or malformed body).
    #[error("Network error: {message}{}", format_context(.context))]
    Network {
        message: String,
        context: ErrorContext,
    },

    /// The client could not be configured.
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" (HTTP {})", status),
        None => String::new(),
    }
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create an API error from its wire-level parts.
    pub fn api(
        code: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
        details: Option<Value>,
    ) -> Self {
        Error::Api {
            code: code.into(),
            message: message.into(),
            status_code,
            details,
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::network_with_context(msg, ErrorContext::new())
    }

    pub fn network_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Network {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// A success response did not have the expected shape.
    pub fn invalid_response(msg: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::api(ErrorCode::InvalidResponse, msg, status_code, None)
    }

    /// The error code: a server-defined code verbatim, or one of [`ErrorCode`].
    pub fn code(&self) -> &str {
        match self {
            Error::Api { code, .. } => code,
            Error::Network { .. } => ErrorCode::NetworkError.as_str(),
            Error::Configuration { .. } => ErrorCode::ConfigurationError.as_str(),
            Error::Serialization(_) => ErrorCode::SerializationError.as_str(),
        }
    }

    /// The client-side code this error corresponds to, if it is not server-defined.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code())
    }

    pub fn message(&self) -> String {
        match self {
            Error::Api { message, .. }
            | Error::Network { message, .. }
            | Error::Configuration { message, .. } => message.clone(),
            Error::Serialization(e) => e.to_string(),
        }
    }

    /// HTTP status of the failed response, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Opaque server-provided error details.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Error::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Network { context, .. } | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
