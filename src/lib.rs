// src/lib.rs

//! Client library for the Livria subscription and commerce backends.
//!
//! The core is [`http::ApiClient`], an authenticated HTTP client with an
//! explicit interceptor pipeline: a bearer-token stage on the way out, a
//! session-teardown stage on 401 on the way in. The domain services
//! ([`services::AuthService`], [`services::UserApiService`],
//! [`services::ClientService`], [`services::BookApiService`],
//! [`services::OrderApiService`]) are thin pass-throughs over it; each pairs
//! with an assembler that maps wire resources to entities.

// Declare modules
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod session;

// Re-export public API
pub use config::ApiConfig;
pub use error::ClientError;
pub use http::{ApiClient, HttpTransport, Navigator, NoopNavigator, TransportResponse};
pub use services::{
    AuthOutcome, AuthService, BookApiService, ClientDraft, ClientService, NewAccount,
    OrderApiService, OrderDraft, OrderItemDraft, UserApiService,
};
pub use session::{MemorySessionStore, Session, SessionStore};

use std::sync::Arc;

/// Fully wired client set: one authenticated client per backend, one session
/// shared between them and the auth flow. A 401 from either backend tears the
/// shared session down.
pub struct LivriaClient {
    pub session: Session,
    pub auth: AuthService,
    pub users: UserApiService,
    pub clients: ClientService,
    pub books: BookApiService,
    pub orders: OrderApiService,
}

impl LivriaClient {
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Session::new(store);
        let api = Arc::new(ApiClient::new(
            config.base_url,
            session.clone(),
            navigator.clone(),
        ));
        let catalog = Arc::new(ApiClient::new(
            config.catalog_base_url,
            session.clone(),
            navigator,
        ));
        Self {
            auth: AuthService::new(api.clone(), session.clone()),
            users: UserApiService::new(api.clone()),
            clients: ClientService::new(api),
            books: BookApiService::new(catalog.clone()),
            orders: OrderApiService::new(catalog),
            session,
        }
    }
}
