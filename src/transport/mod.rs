//! HTTP transport: the single choke point for every call to the Neuredge API.

mod envelope;
mod http;

pub use envelope::ResponsePayload;
pub use http::{HttpTransport, TransportConfig, DEFAULT_TIMEOUT};

pub(crate) use envelope::error_from_envelope;
