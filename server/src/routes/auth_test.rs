use std::sync::Arc;

use identity::parse_session_user;
use reqwest::StatusCode;

use super::*;
use crate::services::backend::{BackendError, LoginResponse};
use crate::state::test_helpers::{MockBackend, http_client, spawn_app, test_app_state};

fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
    resp.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_owned))
        .collect()
}

// =============================================================================
// cookie builders
// =============================================================================

#[test]
fn session_cookies_use_root_path_and_lax() {
    let user = parse_session_user(r#"{"type":"admin"}"#).expect("user");
    let [user_cookie, token_cookie] = session_cookies(&user, "abc", true);
    assert_eq!(user_cookie.name(), USER_KEY);
    assert_eq!(token_cookie.name(), TOKEN_KEY);
    assert_eq!(token_cookie.value(), "abc");
    for cookie in [&user_cookie, &token_cookie] {
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_ne!(cookie.http_only(), Some(true));
    }
}

#[test]
fn user_cookie_value_is_percent_encoded_json() {
    let user = parse_session_user(r#"{"type":"vendeur"}"#).expect("user");
    let [user_cookie, _] = session_cookies(&user, "abc", false);
    assert_eq!(user_cookie.value(), "%7B%22type%22%3A%22vendeur%22%7D");
}

#[test]
fn clear_cookies_expire_immediately() {
    for cookie in clear_session_cookies() {
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}

// =============================================================================
// handlers
// =============================================================================

#[tokio::test]
async fn login_sets_both_cookies_and_echoes_session() {
    let user = parse_session_user(r#"{"type":"agent","nom":"Ada"}"#).expect("user");
    let backend = Arc::new(MockBackend::new().with_login(Ok(LoginResponse { user, token: "tok-1".into() })));
    let base = spawn_app(test_app_state(backend.clone())).await;

    let resp = http_client()
        .post(format!("{base}/api/auth/login"))
        .json(&serde_json::json!({ "email": "ada@oskar.test", "password": "pw" }))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("oskar_user=")));
    assert!(cookies.iter().any(|c| c.starts_with("oskar_token=tok-1")));

    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["token"], "tok-1");
    assert_eq!(body["user"]["type"], "agent");
    assert_eq!(body["user"]["nom"], "Ada");

    let sent = backend.credentials.lock().unwrap();
    assert_eq!(sent[0]["email"], "ada@oskar.test");
}

#[tokio::test]
async fn login_rejection_passes_backend_status_through() {
    let backend = Arc::new(
        MockBackend::new().with_login(Err(BackendError::Rejected {
            status: 401,
            content_type: None,
            body: "bad credentials".into(),
        })),
    );
    let base = spawn_app(test_app_state(backend)).await;

    let resp = http_client()
        .post(format!("{base}/api/auth/login"))
        .json(&serde_json::json!({ "email": "x", "password": "y" }))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(resp.text().await.expect("text"), "bad credentials");
}

#[tokio::test]
async fn login_rejection_keeps_backend_content_type() {
    let backend = Arc::new(MockBackend::new().with_login(Err(BackendError::Rejected {
        status: 401,
        content_type: Some("application/json".into()),
        body: r#"{"message":"Identifiants invalides"}"#.into(),
    })));
    let base = spawn_app(test_app_state(backend)).await;

    let resp = http_client()
        .post(format!("{base}/api/auth/login"))
        .json(&serde_json::json!({ "email": "x", "password": "y" }))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["message"], "Identifiants invalides");
}

#[tokio::test]
async fn login_with_unusable_backend_answer_is_bad_gateway() {
    let backend =
        Arc::new(MockBackend::new().with_login(Err(BackendError::InvalidResponse("missing token".into()))));
    let base = spawn_app(test_app_state(backend)).await;

    let resp = http_client()
        .post(format!("{base}/api/auth/login"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert!(body["error"].as_str().unwrap_or_default().contains("missing token"));
}

#[tokio::test]
async fn logout_clears_both_cookies() {
    let base = spawn_app(test_app_state(Arc::new(MockBackend::new()))).await;
    let resp = http_client().post(format!("{base}/api/auth/logout")).send().await.expect("request");

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn me_returns_cookie_user() {
    let base = spawn_app(test_app_state(Arc::new(MockBackend::new()))).await;
    let resp = http_client()
        .get(format!("{base}/api/auth/me"))
        .header(reqwest::header::COOKIE, r#"oskar_user={"type":"utilisateur","id":3}; oskar_token=abc"#)
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["type"], "utilisateur");
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn me_without_session_is_unauthorized() {
    let base = spawn_app(test_app_state(Arc::new(MockBackend::new()))).await;
    let resp = http_client().get(format!("{base}/api/auth/me")).send().await.expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
