// src/config.rs

use url::Url;

/// Base URLs for the two Livria backends. The subscription API and the
/// commerce catalog are deployed separately and configured independently.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Subscription backend: auth, users, clients.
    pub base_url: Url,
    /// Commerce catalog backend: books, orders.
    pub catalog_base_url: Url,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://livria-sv.mysql.database.azure.com/api")
                .expect("default base URL is well-formed"),
            catalog_base_url: Url::parse("https://livria.onrender.com")
                .expect("default catalog URL is well-formed"),
        }
    }
}

/// Endpoint path templates, centralized so no service hardcodes a path.
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const VALIDATE_TOKEN: &str = "/auth/validate-token";

    pub const USERS: &str = "/users";
    pub const USER_PROFILE: &str = "/users/profile";

    pub fn user_by_id(id: i64) -> String {
        format!("/users/{id}")
    }

    pub fn change_password(id: i64) -> String {
        format!("/users/{id}/change-password")
    }

    pub const CLIENTS: &str = "/clients";

    pub fn client_by_id(id: i64) -> String {
        format!("/clients/{id}")
    }

    pub fn clients_by_user(user_id: i64) -> String {
        format!("/clients/user/{user_id}")
    }

    pub const BOOKS: &str = "/books";

    pub fn book_by_id(id: i64) -> String {
        format!("/books/{id}")
    }

    // The commerce backend exposes orders under a singular path.
    pub const ORDERS: &str = "/order";
}
