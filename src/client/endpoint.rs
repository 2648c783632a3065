use crate::transport::HttpTransport;

/// A capability's view of the shared transport: the transport plus the fixed path
/// prefix all of that capability's endpoints live under.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CapabilityScope<'a> {
    pub(crate) transport: &'a HttpTransport,
    base_path: &'static str,
}

impl<'a> CapabilityScope<'a> {
    pub(crate) fn new(transport: &'a HttpTransport, base_path: &'static str) -> Self {
        Self {
            transport,
            base_path,
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }
}
