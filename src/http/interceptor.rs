// src/http/interceptor.rs

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use super::interface::RequestDescriptor;
use crate::session::Session;

/// Outbound stage: may rewrite a request before it is handed to the transport.
/// Stages run synchronously relative to dispatch and must not block on I/O.
pub trait RequestStage: Send + Sync {
    fn apply(&self, request: &mut RequestDescriptor);
}

/// Inbound stage: observes the status of every response before the outcome
/// reaches the caller. Stages may produce side effects but never swallow the
/// outcome.
pub trait ResponseStage: Send + Sync {
    fn inspect(&self, status: StatusCode);
}

/// Redirect target invoked when the session is invalidated server-side.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator for embedders that handle navigation themselves.
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self) {}
}

/// Attaches `Authorization: Bearer <token>` when a token is present in the
/// session store. Reads a snapshot at send time, so concurrent requests each
/// see the latest stored token.
pub struct BearerAuth {
    session: Session,
}

impl BearerAuth {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl RequestStage for BearerAuth {
    fn apply(&self, request: &mut RequestDescriptor) {
        let Some(token) = self.session.token() else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => {
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(e) => {
                tracing::warn!(
                    target: "livria_client::http::interceptor",
                    error = %e,
                    "Stored token is not a valid header value, sending request unauthenticated"
                );
            }
        }
    }
}

/// The 401 stage: an unauthorized response invalidates the session. Clears the
/// stored token and user record and redirects to the login view; the error
/// itself still reaches the caller.
pub struct SessionGuard {
    session: Session,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl ResponseStage for SessionGuard {
    fn inspect(&self, status: StatusCode) {
        if status != StatusCode::UNAUTHORIZED {
            return;
        }
        tracing::warn!(
            target: "livria_client::http::interceptor",
            "Received 401 Unauthorized, clearing session"
        );
        self.session.clear();
        self.navigator.redirect_to_login();
    }
}
