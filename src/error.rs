// src/error.rs

use reqwest::StatusCode;

/// Error type shared by the HTTP client and the domain services.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API returned an error: status={status}, message={message}")]
    Api {
        status: StatusCode,
        message: String,
    },
    #[error("Internal client error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Status of the underlying HTTP failure, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Reqwest(e) => e.status(),
            _ => None,
        }
    }
}
