//! Test utilities for end-to-end gateway tests.

use axum_test::TestServer;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{Application, Config};

/// A test configuration pointing at a mock backend. The `/users` page is
/// configured to require the `view_users` permission so guard behaviour
/// can be exercised.
pub fn create_test_config(backend_url: &str) -> Config {
    let mut config = Config::default();
    config.backend.base_url = Url::parse(backend_url).expect("mock backend URL is valid");
    config.session.cookie_secure = false;
    config
        .guard
        .required_permissions
        .insert("/users".to_string(), vec!["view_users".to_string()]);
    config
}

pub fn create_test_app(config: Config) -> TestServer {
    Application::new(config).expect("Failed to create application").into_test_server()
}

pub fn user_json(username: &str, permissions: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "",
        "last_name": "",
        "is_active": true,
        "is_staff": true,
        "permissions": permissions,
    })
}

/// Mount the backend's current-user endpoint for a given token.
pub async fn mock_current_user(server: &MockServer, token: &str, permissions: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/accounts/users/me/"))
        .and(header("authorization", format!("Token {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("admin", permissions)))
        .mount(server)
        .await;
}

/// Mount a login endpoint issuing the given token for any credentials.
pub async fn mock_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/accounts/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token })))
        .mount(server)
        .await;
}
