use super::*;

// =============================================================================
// backend_url
// =============================================================================

#[test]
fn backend_url_joins_without_double_slash() {
    assert_eq!(backend_url("http://api/", "/annonces", None).unwrap(), "http://api/annonces");
    assert_eq!(backend_url("http://api", "annonces/3", None).unwrap(), "http://api/annonces/3");
}

#[test]
fn backend_url_appends_query() {
    assert_eq!(
        backend_url("http://api", "produits", Some("page=2&q=vélo")).unwrap(),
        "http://api/produits?page=2&q=vélo"
    );
}

#[test]
fn backend_url_ignores_empty_query() {
    assert_eq!(backend_url("http://api", "produits", Some("")).unwrap(), "http://api/produits");
}

#[test]
fn backend_url_refuses_to_climb_above_base() {
    let err = backend_url("http://backend.example/api/v1", "../../internal/admin", None).unwrap_err();
    assert!(matches!(err, BackendError::InvalidPath(_)));
}

// =============================================================================
// check_relative_path
// =============================================================================

#[test]
fn relative_path_allows_ordinary_segments() {
    assert!(check_relative_path("annonces/3").is_ok());
    assert!(check_relative_path("fichiers/v1..2/notes.txt").is_ok());
    assert!(check_relative_path("").is_ok());
}

#[test]
fn relative_path_rejects_dot_segments() {
    for path in ["..", "a/../b", "a/./b", "a\\..\\b", "%2e%2e/admin", "a/%2E%2E", "%2e"] {
        assert!(matches!(check_relative_path(path), Err(BackendError::InvalidPath(_))), "{path}");
    }
}

// =============================================================================
// parse_login_response
// =============================================================================

#[test]
fn login_response_parses_user_and_token() {
    let login = parse_login_response(r#"{"user":{"type":"agent","email":"a@o.test"},"token":"t-1"}"#)
        .expect("login");
    assert_eq!(login.token, "t-1");
    assert_eq!(login.user.role.as_str(), "agent");
    assert_eq!(login.user.field("email"), Some(&serde_json::json!("a@o.test")));
}

#[test]
fn login_response_without_token_is_invalid() {
    let err = parse_login_response(r#"{"user":{"type":"agent"}}"#).unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[test]
fn login_response_with_empty_token_is_invalid() {
    let err = parse_login_response(r#"{"user":{"type":"agent"},"token":""}"#).unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[test]
fn login_response_without_role_is_invalid() {
    let err = parse_login_response(r#"{"user":{"email":"a@o.test"},"token":"t"}"#).unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(msg) if msg.contains("type")));
}

#[test]
fn login_response_non_json_is_invalid() {
    let err = parse_login_response("<html>").unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[test]
fn http_backend_builds() {
    assert!(HttpBackend::new("http://localhost:9", 5).is_ok());
}
