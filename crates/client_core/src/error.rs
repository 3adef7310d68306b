use shared::error::Rejection;
use thiserror::Error;

/// Everything that can go wrong between issuing a request and holding its
/// decoded payload. The fetch coordinator treats all variants the same way:
/// clear the in-flight flag, leave accumulated state alone, surface upward.
#[derive(Debug, Error)]
pub enum OrderApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("server rejected request: {0}")]
    Rejected(#[from] Rejection),
    #[error("no order backend configured")]
    Unconfigured,
}
