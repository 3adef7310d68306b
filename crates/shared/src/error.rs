use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the `errors` array carried by a rejected response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub description: String,
}

impl ApiErrorDetail {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// A response the server answered but refused: `success == false`, or a
/// success envelope that carried no data.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
    pub errors: Vec<ApiErrorDetail>,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}
