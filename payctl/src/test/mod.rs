//! End-to-end gateway tests against a mocked payment backend.

use axum::http::{HeaderValue, StatusCode, header};
use wiremock::matchers::{header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{create_test_app, create_test_config, mock_current_user, mock_login, user_json};

fn cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("token={token}")).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_login_sets_session_cookie() {
    let backend = MockServer::start().await;
    mock_login(&backend, "tok-live").await;
    mock_current_user(&backend, "tok-live", &["view_users"]).await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({"username": "admin", "password": "hunter22"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("login must set the session cookie");
    assert!(set_cookie.starts_with("token=tok-live;"));
    assert!(set_cookie.contains("HttpOnly"));

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["username"], "admin");
}

#[test_log::test(tokio::test)]
async fn test_login_exchange_carries_no_authorization_header() {
    let backend = MockServer::start().await;
    // Mounted first: a login request carrying a stray Token undefined
    // header would hit this mock and trip its expect(0)
    Mock::given(method("POST"))
        .and(path("/api/accounts/auth/login/"))
        .and(header_matcher("authorization", "Token undefined"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&backend)
        .await;
    mock_login(&backend, "tok-live").await;
    mock_current_user(&backend, "tok-live", &[]).await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({"username": "admin", "password": "hunter22"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn test_login_with_bad_credentials_is_401() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"detail": "bad credentials"})))
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({"username": "admin", "password": "wrong"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[test_log::test(tokio::test)]
async fn test_logout_clears_cookie_even_when_backend_is_down() {
    // No logout mock mounted: the backend answers 404 and revocation fails
    let backend = MockServer::start().await;
    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/auth/logout")
        .add_header(header::COOKIE, cookie("tok-dead"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("logout must clear the session cookie");
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[test_log::test(tokio::test)]
async fn test_stats_are_relayed_verbatim() {
    let backend = MockServer::start().await;
    let stats = serde_json::json!({
        "total_users": 12,
        "total_vendors": 3,
        "total_transactions": 240,
        "total_amount": "1024.50",
        "transactions_by_type": {"PAYMENT": 200, "TOP_UP": 40},
        "transactions_by_status": {"COMPLETED": 230, "PENDING": 10},
        "recent_transactions": [],
    });
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats/"))
        .and(header_matcher("authorization", "Token tok-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats.clone()))
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .get("/api/dashboard/stats")
        .add_header(header::COOKIE, cookie("tok-live"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, stats);
}

#[test_log::test(tokio::test)]
async fn test_backend_failure_collapses_to_error_envelope() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .get("/api/dashboard/stats")
        .add_header(header::COOKIE, cookie("tok-live"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({"error": "Failed to fetch dashboard stats"}));
}

#[test_log::test(tokio::test)]
async fn test_missing_session_forwards_token_undefined() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats/"))
        .and(header_matcher("authorization", "Token undefined"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Invalid token."})))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/api/dashboard/stats").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to fetch dashboard stats");
}

#[test_log::test(tokio::test)]
async fn test_list_reads_are_cached_per_session() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 1, "next": null, "previous": null, "results": [user_json("alice", &[])],
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    for _ in 0..3 {
        let response = server.get("/api/users").add_header(header::COOKIE, cookie("tok-live")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["count"], 1);
    }
}

#[test_log::test(tokio::test)]
async fn test_successful_delete_invalidates_the_list() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 1, "next": null, "previous": null, "results": [user_json("alice", &[])],
        })))
        .expect(2)
        .mount(&backend)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/accounts/users/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));
    let session = cookie("tok-live");

    // Prime the cache, then a cached read
    server.get("/api/users").add_header(header::COOKIE, session.clone()).await;
    server.get("/api/users").add_header(header::COOKIE, session.clone()).await;

    let response = server
        .delete("/api/users/3")
        .add_query_param("confirm", "true")
        .add_header(header::COOKIE, session.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // The delete bumped the generation: this read refetches
    let response = server.get("/api/users").add_header(header::COOKIE, session).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn test_unconfirmed_delete_forwards_nothing() {
    let backend = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/accounts/users/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.delete("/api/users/3").add_header(header::COOKIE, cookie("tok-live")).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // confirm=false is equally refused
    let response = server
        .delete("/api/users/3")
        .add_query_param("confirm", "false")
        .add_header(header::COOKIE, cookie("tok-live"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_failed_mutation_keeps_the_cache() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 0, "next": null, "previous": null, "results": [],
        })))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/users/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));
    let session = cookie("tok-live");

    server.get("/api/users").add_header(header::COOKIE, session.clone()).await;

    let response = server
        .post("/api/users")
        .add_header(header::COOKIE, session.clone())
        .json(&serde_json::json!({"username": "bob", "email": "bob@example.com", "password": "secret"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    // The failed create must not have invalidated the cached list
    let response = server.get("/api/users").add_header(header::COOKIE, session).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn test_invalid_form_is_rejected_before_forwarding() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/users/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/users")
        .add_header(header::COOKIE, cookie("tok-live"))
        .json(&serde_json::json!({"username": "bob", "email": "not-an-email", "password": "secret"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Invalid email address");
}

#[test_log::test(tokio::test)]
async fn test_payment_is_created_and_relayed() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions/transactions/make_payment/"))
        .and(header_matcher("authorization", "Token tok-live"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 77, "status": "COMPLETED"})))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/transactions/payment")
        .add_header(header::COOKIE, cookie("tok-live"))
        .json(&serde_json::json!({"receiver_id": 9, "amount": "19.99"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], 77);
}

#[test_log::test(tokio::test)]
async fn test_anonymous_page_request_redirects_to_login() {
    let backend = MockServer::start().await;
    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/transactions").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()), Some("/login"));
}

#[test_log::test(tokio::test)]
async fn test_page_without_required_permission_redirects_to_unauthorized() {
    let backend = MockServer::start().await;
    // Session is live but carries no permissions; /users requires view_users
    mock_current_user(&backend, "tok-live", &[]).await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/users").add_header(header::COOKIE, cookie("tok-live")).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/unauthorized")
    );
}

#[test_log::test(tokio::test)]
async fn test_page_with_permission_serves_the_shell() {
    let backend = MockServer::start().await;
    mock_current_user(&backend, "tok-live", &["view_users"]).await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/users").add_header(header::COOKIE, cookie("tok-live")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<!doctype html>"));
}

#[test_log::test(tokio::test)]
async fn test_dead_session_on_page_redirects_to_login() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Invalid token."})))
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/transactions").add_header(header::COOKIE, cookie("tok-expired")).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()), Some("/login"));
}

#[test_log::test(tokio::test)]
async fn test_login_page_is_never_guarded() {
    let backend = MockServer::start().await;
    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/login").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<!doctype html>"));
}

#[test_log::test(tokio::test)]
async fn test_me_endpoint_resolves_session() {
    let backend = MockServer::start().await;
    mock_current_user(&backend, "tok-live", &["view_users"]).await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/api/auth/me").add_header(header::COOKIE, cookie("tok-live")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "admin");

    // Without a cookie the endpoint rejects instead of proxying
    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_passthrough_mode_relays_backend_status() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/users/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({"detail": "forbidden"})))
        .mount(&backend)
        .await;

    let mut config = create_test_config(&backend.uri());
    config.proxy.passthrough_status = true;
    let server = create_test_app(config);

    let response = server.get("/api/users").add_header(header::COOKIE, cookie("tok-live")).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["detail"], "forbidden");
}

#[test_log::test(tokio::test)]
async fn test_healthz() {
    let backend = MockServer::start().await;
    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[test_log::test(tokio::test)]
async fn test_cancel_transaction_hits_backend_action_path() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions/transactions/42/cancel_transaction/"))
        .and(header_matcher("authorization", "Token tok-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 42, "status": "CANCELLED"})))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/transactions/42/cancel")
        .add_header(header::COOKIE, cookie("tok-live"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "CANCELLED");
}

#[test_log::test(tokio::test)]
async fn test_balance_update_requires_nonzero_amount() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/user-profiles/5/add_balance/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"balance": "60.00"})))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    let response = server
        .post("/api/users/5/balance")
        .add_header(header::COOKIE, cookie("tok-live"))
        .json(&serde_json::json!({"amount": "0"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/users/5/balance")
        .add_header(header::COOKIE, cookie("tok-live"))
        .json(&serde_json::json!({"amount": "10.00", "description": "prize"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn test_confirm_flag_is_not_forwarded_to_the_backend() {
    let backend = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/vendors/vendors/2/"))
        .and(query_param("confirm", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&backend)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/vendors/vendors/2/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend)
        .await;

    let server = create_test_app(create_test_config(&backend.uri()));

    // The confirm flag is consumed by the gateway; the backend sees a
    // plain DELETE
    let response = server
        .delete("/api/vendors/2")
        .add_query_param("confirm", "true")
        .add_header(header::COOKIE, cookie("tok-live"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
