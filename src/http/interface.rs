// src/http/interface.rs

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;

/// One outgoing request, fully resolved. Immutable once handed to the
/// transport; the interceptor stages run before that point.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Raw response as the transport saw it. Mapping the body into entities is the
/// caller's responsibility, not the client's.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(ClientError::Json)
    }
}

/// Trait for abstracting the HTTP transport to allow mocking in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: RequestDescriptor) -> Result<TransportResponse, ClientError>;
}
