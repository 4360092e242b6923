// tests/auth_flow.rs
//
// End-to-end flow over the wired client set: register against the
// subscription backend, carry the token to both backends, lose the session on
// a 401 and keep going anonymously.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use httptest::{
    Expectation, Server,
    matchers::{all_of, contains, key, not, request},
    responders::{json_encoded, status_code},
};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

use livria_client::{
    ApiConfig, ClientError, LivriaClient, MemorySessionStore, Navigator, NewAccount,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

fn wired_client(
    api_server: &Server,
    catalog_server: &Server,
    navigator: Arc<RecordingNavigator>,
) -> LivriaClient {
    let config = ApiConfig {
        base_url: Url::parse(&api_server.url_str("")).unwrap(),
        catalog_base_url: Url::parse(&catalog_server.url_str("")).unwrap(),
    };
    LivriaClient::new(config, Arc::new(MemorySessionStore::default()), navigator)
}

#[tokio::test]
async fn session_follows_the_token_across_both_backends() {
    init_tracing();
    let api_server = Server::run();
    let catalog_server = Server::run();
    let navigator = Arc::new(RecordingNavigator::default());
    let client = wired_client(&api_server, &catalog_server, navigator.clone());

    // Registration mints the session.
    api_server.expect(
        Expectation::matching(request::method_path("POST", "/auth/register")).respond_with(
            json_encoded(json!({
                "success": true,
                "token": "T9",
                "user": {"id": 7, "nickname": "ana", "username": "ana99", "email": "a@x.com"}
            })),
        ),
    );

    let account = NewAccount {
        nickname: "ana".to_string(),
        username: "ana99".to_string(),
        email: "a@x.com".to_string(),
        password: SecretString::from("secret123".to_string()),
        phrase: None,
        avatar_url: None,
        plan_type: None,
    };
    let outcome = client.auth.register(&account).await;
    assert!(outcome.success);
    assert_eq!(client.session.token().as_deref(), Some("T9"));

    // The subscription backend sees the bearer token.
    api_server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/users/profile"),
            request::headers(contains(("authorization", "Bearer T9"))),
        ])
        .respond_with(json_encoded(json!({
            "success": true,
            "data": {"id": 7, "nickname": "ana", "username": "ana99", "email": "a@x.com"}
        }))),
    );
    let profile = client.users.get_current_user_profile().await.unwrap();
    assert_eq!(profile.id, 7);

    // The catalog shares the session; a 401 from it tears the session down.
    catalog_server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/books"),
            request::headers(contains(("authorization", "Bearer T9"))),
        ])
        .respond_with(status_code(401).body("token expired")),
    );
    let failed = client.books.get_books().await;
    assert!(matches!(failed, Err(ClientError::Api { status, .. })
        if status == reqwest::StatusCode::UNAUTHORIZED));
    assert!(client.session.token().is_none());
    assert!(client.session.current_user().is_none());
    assert_eq!(navigator.redirects.load(Ordering::SeqCst), 1);

    // Follow-up calls go out anonymously.
    api_server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/users"),
            request::headers(not(contains(key("authorization")))),
        ])
        .respond_with(json_encoded(json!({"success": true, "data": []}))),
    );
    let users = client.users.get_users().await.unwrap();
    assert!(users.is_empty());
}
