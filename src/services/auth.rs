// src/services/auth.rs

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::envelope;
use super::users::{NewAccount, UserResource, assembler};
use crate::config::endpoints;
use crate::error::ClientError;
use crate::http::{ApiClient, TransportResponse};
use crate::models::User;
use crate::session::Session;

const TARGET: &str = "livria_client::services::auth";

/// Structured result of an authentication flow. Failures are reported here
/// instead of through [`ClientError`].
#[derive(Debug, Clone, Default)]
pub struct AuthOutcome {
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<User>,
    pub message: Option<String>,
    pub errors: Vec<String>,
}

impl AuthOutcome {
    fn failure(message: Option<String>, fallback: &str, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: Some(message.unwrap_or_else(|| fallback.to_owned())),
            errors,
            ..Self::default()
        }
    }

    fn connection_failure() -> Self {
        Self {
            success: false,
            message: Some("Error de conexión".to_owned()),
            errors: vec!["No se pudo conectar con el servidor".to_owned()],
            ..Self::default()
        }
    }
}

/// Wire shape of a login/register response.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AuthResponse {
    success: bool,
    token: Option<String>,
    user: Option<UserResource>,
    message: Option<String>,
    errors: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username_or_email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct TokenCheckRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TokenCheckResponse {
    #[serde(rename = "isValid")]
    is_valid: bool,
}

/// Authentication flow over the subscription backend. Owns nothing: the
/// session state lives in the injected store, shared with the client's
/// interceptor stages.
pub struct AuthService {
    http: Arc<ApiClient>,
    session: Session,
}

impl AuthService {
    pub fn new(http: Arc<ApiClient>, session: Session) -> Self {
        Self { http, session }
    }

    /// Log in with a username or email. Persists the session on success; every
    /// failure comes back as a structured outcome, never as an error.
    pub async fn login(&self, username_or_email: &str, password: &SecretString) -> AuthOutcome {
        let request = LoginRequest {
            username_or_email,
            password: password.expose_secret(),
        };
        tracing::info!(target: TARGET, identifier = %username_or_email, "Attempting login");
        match self.http.post(endpoints::LOGIN, &request).await {
            Ok(response) => self.accept(&response, "Error de autenticación"),
            Err(e) => {
                tracing::error!(target: TARGET, error = %e, "Error during login");
                Self::reject(&e, "Error de autenticación")
            }
        }
    }

    /// Register a new account. Persists the session on success, like login.
    pub async fn register(&self, account: &NewAccount) -> AuthOutcome {
        let request = assembler::to_register_resource(account);
        tracing::info!(target: TARGET, username = %account.username, "Attempting registration");
        match self.http.post(endpoints::REGISTER, &request).await {
            Ok(response) => self.accept(&response, "Error de registro"),
            Err(e) => {
                tracing::error!(target: TARGET, error = %e, "Error during registration");
                Self::reject(&e, "Error de registro")
            }
        }
    }

    /// True when the backend accepts the token. Any failure reads as invalid.
    pub async fn validate_token(&self, token: &str) -> bool {
        let request = TokenCheckRequest { token };
        match self.http.post(endpoints::VALIDATE_TOKEN, &request).await {
            Ok(response) => match response.json::<TokenCheckResponse>() {
                Ok(body) => body.is_valid,
                Err(e) => {
                    tracing::error!(target: TARGET, error = %e, "Error validating token");
                    false
                }
            },
            Err(e) => {
                tracing::error!(target: TARGET, error = %e, "Error validating token");
                false
            }
        }
    }

    /// Drop the persisted session. Purely local; the token is not revoked
    /// server-side.
    pub fn logout(&self) {
        self.session.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    fn accept(&self, response: &TransportResponse, fallback: &str) -> AuthOutcome {
        let body = match response.json::<AuthResponse>() {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(target: TARGET, error = %e, "Authentication response was not valid JSON");
                return AuthOutcome::failure(None, fallback, Vec::new());
            }
        };

        if !body.success {
            return AuthOutcome::failure(body.message, fallback, body.errors.unwrap_or_default());
        }

        let (Some(token), Some(user)) = (body.token, body.user) else {
            tracing::error!(target: TARGET, "Authentication response missing token or user");
            return AuthOutcome::failure(None, fallback, Vec::new());
        };

        if let Err(e) = self.session.store_login(&token, &user) {
            tracing::error!(target: TARGET, error = %e, "Failed to persist session");
        }

        AuthOutcome {
            success: true,
            token: Some(token),
            user: Some(assembler::to_entity(user)),
            message: body.message,
            errors: Vec::new(),
        }
    }

    // An HTTP error body may carry {message, errors}; anything without a
    // response at all is a connection failure.
    fn reject(error: &ClientError, fallback: &str) -> AuthOutcome {
        match error {
            ClientError::Api { message, .. } => {
                let (message, errors) = envelope::error_details(message);
                AuthOutcome::failure(message, fallback, errors)
            }
            _ => AuthOutcome::connection_failure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::http::NoopNavigator;
    use crate::session::MemorySessionStore;

    fn service_for(server: &Server) -> AuthService {
        let session = Session::new(Arc::new(MemorySessionStore::default()));
        let base_url = Url::parse(&server.url_str("")).unwrap();
        let http = Arc::new(ApiClient::new(
            base_url,
            session.clone(),
            Arc::new(NoopNavigator),
        ));
        AuthService::new(http, session)
    }

    fn unreachable_service() -> AuthService {
        let session = Session::new(Arc::new(MemorySessionStore::default()));
        let base_url = Url::parse("http://127.0.0.1:1").unwrap();
        let http = Arc::new(ApiClient::new(
            base_url,
            session.clone(),
            Arc::new(NoopNavigator),
        ));
        AuthService::new(http, session)
    }

    #[tokio::test]
    async fn login_success_persists_token_and_returns_entity() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/auth/login"),
                request::body(json_decoded(eq(json!({
                    "usernameOrEmail": "ana99",
                    "password": "secret"
                })))),
            ])
            .respond_with(json_encoded(json!({
                "success": true,
                "token": "T1",
                "user": {"id": 1, "nickname": "ana", "username": "ana99",
                         "email": "a@x.com", "planType": "premium"},
                "message": "Bienvenida"
            }))),
        );

        let auth = service_for(&server);
        let outcome = auth
            .login("ana99", &SecretString::from("secret".to_string()))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.token.as_deref(), Some("T1"));
        let user = outcome.user.unwrap();
        assert_eq!(user.nickname, "ana");
        assert!(user.is_premium());

        assert_eq!(auth.token().as_deref(), Some("T1"));
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user().unwrap().id, 1);
    }

    #[tokio::test]
    async fn login_rejected_by_backend_keeps_store_untouched() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/auth/login")).respond_with(
                json_encoded(json!({
                    "success": false,
                    "message": "Credenciales inválidas",
                    "errors": ["usernameOrEmail"]
                })),
            ),
        );

        let auth = service_for(&server);
        let outcome = auth
            .login("ana99", &SecretString::from("wrong".to_string()))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Credenciales inválidas"));
        assert_eq!(outcome.errors, vec!["usernameOrEmail".to_string()]);
        assert!(auth.token().is_none());
    }

    #[tokio::test]
    async fn login_http_error_body_is_converted_to_outcome() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/auth/login")).respond_with(
                status_code(400)
                    .body(json!({"message": "Cuenta bloqueada", "errors": ["locked"]}).to_string()),
            ),
        );

        let auth = service_for(&server);
        let outcome = auth
            .login("ana99", &SecretString::from("secret".to_string()))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Cuenta bloqueada"));
        assert_eq!(outcome.errors, vec!["locked".to_string()]);
    }

    #[tokio::test]
    async fn login_http_error_without_details_uses_the_fallback_message() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/auth/login"))
                .respond_with(status_code(500).body("upstream exploded")),
        );

        let auth = service_for(&server);
        let outcome = auth
            .login("ana99", &SecretString::from("secret".to_string()))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Error de autenticación"));
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn login_connection_failure_yields_the_connection_outcome() {
        let auth = unreachable_service();
        let outcome = auth
            .login("ana99", &SecretString::from("secret".to_string()))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Error de conexión"));
        assert_eq!(
            outcome.errors,
            vec!["No se pudo conectar con el servidor".to_string()]
        );
        assert!(auth.token().is_none());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn register_success_persists_session() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/auth/register"),
                request::body(json_decoded(eq(json!({
                    "nickname": "ana",
                    "username": "ana99",
                    "email": "a@x.com",
                    "password": "secret",
                    "phrase": null,
                    "avatarUrl": null,
                    "planType": "basic"
                })))),
            ])
            .respond_with(json_encoded(json!({
                "success": true,
                "token": "T2",
                "user": {"id": 5, "nickname": "ana", "username": "ana99", "email": "a@x.com"}
            }))),
        );

        let auth = service_for(&server);
        let account = NewAccount {
            nickname: "ana".to_string(),
            username: "ana99".to_string(),
            email: "a@x.com".to_string(),
            password: SecretString::from("secret".to_string()),
            phrase: None,
            avatar_url: None,
            plan_type: None,
        };
        let outcome = auth.register(&account).await;

        assert!(outcome.success);
        assert_eq!(auth.token().as_deref(), Some("T2"));
        assert!(outcome.user.unwrap().is_basic());
    }

    #[tokio::test]
    async fn register_connection_failure_uses_the_connection_outcome() {
        let auth = unreachable_service();
        let account = NewAccount {
            nickname: "ana".to_string(),
            username: "ana99".to_string(),
            email: "a@x.com".to_string(),
            password: SecretString::from("secret".to_string()),
            phrase: None,
            avatar_url: None,
            plan_type: None,
        };
        let outcome = auth.register(&account).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Error de conexión"));
    }

    #[tokio::test]
    async fn validate_token_reads_the_flag_and_fails_closed() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/auth/validate-token"),
                request::body(json_decoded(eq(json!({"token": "T1"})))),
            ])
            .respond_with(json_encoded(json!({"isValid": true}))),
        );

        let auth = service_for(&server);
        assert!(auth.validate_token("T1").await);
        assert!(!unreachable_service().validate_token("T1").await);
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/auth/login")).respond_with(
                json_encoded(json!({
                    "success": true,
                    "token": "T1",
                    "user": {"id": 1, "username": "ana99"}
                })),
            ),
        );

        let auth = service_for(&server);
        auth.login("ana99", &SecretString::from("secret".to_string()))
            .await;
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }
}
