//! Types shared by several capabilities.

use serde::{Deserialize, Serialize};

/// Token usage reported alongside a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub total: u64,
}

/// Account quota snapshot reported alongside a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiQuota {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub remaining: u64,
    #[serde(default)]
    pub current_request: u64,
}

/// `{result, usage, quota}` envelope returned by the text endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ApiUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<ApiQuota>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> T {
        self.result
    }
}
