// src/http/implementation.rs

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;

use super::interface::{HttpTransport, RequestDescriptor, TransportResponse};
use crate::error::ClientError;

/// Production transport backed by reqwest.
#[derive(Default)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    pub fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: RequestDescriptor) -> Result<TransportResponse, ClientError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(ClientError::Reqwest)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(ClientError::Reqwest)?;
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
