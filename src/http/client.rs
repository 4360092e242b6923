// src/http/client.rs

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::implementation::ReqwestTransport;
use super::interceptor::{BearerAuth, Navigator, RequestStage, ResponseStage, SessionGuard};
use super::interface::{HttpTransport, RequestDescriptor, TransportResponse};
use super::util::build_url;
use crate::error::ClientError;
use crate::session::Session;

/// Per-call overrides merged into the request before the interceptor stages
/// run.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

/// Authenticated HTTP client: a fixed base URL, a default JSON content type,
/// and an interceptor pipeline around every call. Outbound, [`BearerAuth`]
/// attaches the session token; inbound, [`SessionGuard`] tears the session
/// down on 401 before the error reaches the caller.
///
/// The client returns the transport's raw response on success; mapping the
/// body is the caller's (assembler's) responsibility.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    request_stages: Vec<Box<dyn RequestStage>>,
    response_stages: Vec<Box<dyn ResponseStage>>,
}

impl ApiClient {
    /// Client with the standard pipeline over the reqwest transport.
    pub fn new(base_url: Url, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_transport(
            Arc::new(ReqwestTransport::default()),
            base_url,
            session,
            navigator,
        )
    }

    /// Same pipeline over an injected transport.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        base_url: Url,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            base_url,
            request_stages: vec![Box::new(BearerAuth::new(session.clone()))],
            response_stages: vec![Box::new(SessionGuard::new(session, navigator))],
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<TransportResponse, ClientError> {
        self.execute(Method::GET, path, None, RequestOptions::default())
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TransportResponse, ClientError> {
        self.execute(
            Method::POST,
            path,
            Some(serde_json::to_value(body)?),
            RequestOptions::default(),
        )
        .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TransportResponse, ClientError> {
        self.execute(
            Method::PUT,
            path,
            Some(serde_json::to_value(body)?),
            RequestOptions::default(),
        )
        .await
    }

    pub async fn delete(&self, path: &str) -> Result<TransportResponse, ClientError> {
        self.execute(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    /// Issue one request through the full pipeline. Non-2xx statuses come back
    /// as [`ClientError::Api`] carrying the body text; by that point the 401
    /// side effects have already run.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<TransportResponse, ClientError> {
        let url = build_url(&self.base_url, path)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers {
            headers.insert(name, value);
        }

        let mut request = RequestDescriptor {
            method,
            url,
            headers,
            body,
        };
        for stage in &self.request_stages {
            stage.apply(&mut request);
        }

        tracing::debug!(
            target: "livria_client::http::client",
            method = %request.method,
            url = %request.url,
            "Dispatching request"
        );
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(target: "livria_client::http::client", error = %e, "Transport failure");
                return Err(e);
            }
        };

        for stage in &self.response_stages {
            stage.inspect(response.status);
        }

        if response.status.is_success() {
            Ok(response)
        } else {
            tracing::error!(
                target: "livria_client::http::client",
                status = %response.status,
                error_body = %response.body,
                "API request failed"
            );
            Err(ClientError::Api {
                status: response.status,
                message: response.body,
            })
        }
    }
}
