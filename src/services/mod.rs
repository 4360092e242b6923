// src/services/mod.rs

// Declare modules
pub mod auth;
pub mod books;
pub mod clients;
pub mod envelope;
pub mod orders;
pub mod users;

// Re-export public API
pub use self::auth::{AuthOutcome, AuthService};
pub use self::books::BookApiService;
pub use self::clients::{ClientDraft, ClientService};
pub use self::orders::{OrderApiService, OrderDraft, OrderItemDraft};
pub use self::users::{NewAccount, UserApiService};

use crate::error::ClientError;

// Every service logs its failures and re-raises; none of them recovers.
pub(crate) fn log_and_rethrow(message: &'static str, error: ClientError) -> ClientError {
    tracing::error!(target: "livria_client::services", error = %error, "{message}");
    error
}
