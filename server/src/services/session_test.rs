use std::collections::HashMap;

use super::*;

fn cookies(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

// =============================================================================
// read_session
// =============================================================================

#[test]
fn no_cookies_is_absent() {
    assert!(matches!(read_session(&cookies(&[])), SessionLookup::Absent));
}

#[test]
fn user_without_token_is_absent() {
    let source = cookies(&[(USER_KEY, r#"{"type":"admin"}"#)]);
    assert!(matches!(read_session(&source), SessionLookup::Absent));
}

#[test]
fn token_without_user_is_absent() {
    let source = cookies(&[(TOKEN_KEY, "abc")]);
    assert!(matches!(read_session(&source), SessionLookup::Absent));
}

#[test]
fn empty_token_is_absent() {
    let source = cookies(&[(USER_KEY, r#"{"type":"admin"}"#), (TOKEN_KEY, "")]);
    assert!(matches!(read_session(&source), SessionLookup::Absent));
}

#[test]
fn raw_json_cookie_is_present() {
    let source = cookies(&[(USER_KEY, r#"{"type":"admin"}"#), (TOKEN_KEY, "abc")]);
    let session = read_session(&source).into_session().expect("session");
    assert_eq!(session.user.role.as_str(), "admin");
    assert_eq!(session.token, "abc");
}

#[test]
fn raw_json_cookie_keeps_literal_percent_sequences() {
    let source = cookies(&[(USER_KEY, r#"{"type":"admin","nom":"50%41"}"#), (TOKEN_KEY, "abc")]);
    let session = read_session(&source).into_session().expect("session");
    assert_eq!(session.user.field("nom"), Some(&serde_json::json!("50%41")));
}

#[test]
fn raw_json_cookie_with_stray_percent_still_parses() {
    let source = cookies(&[(USER_KEY, r#"{"type":"vendeur","remise":"10%"}"#), (TOKEN_KEY, "abc")]);
    let session = read_session(&source).into_session().expect("session");
    assert_eq!(session.user.field("remise"), Some(&serde_json::json!("10%")));
}

#[test]
fn percent_encoded_cookie_is_present() {
    let source = cookies(&[(USER_KEY, "%7B%22type%22%3A%22vendeur%22%7D"), (TOKEN_KEY, "abc")]);
    let session = read_session(&source).into_session().expect("session");
    assert_eq!(session.user.role.as_str(), "vendeur");
}

#[test]
fn malformed_json_is_reported_not_raised() {
    let source = cookies(&[(USER_KEY, "{type:admin"), (TOKEN_KEY, "abc")]);
    let lookup = read_session(&source);
    assert!(matches!(lookup, SessionLookup::Malformed(SessionParseError::Json(_))));
    assert!(lookup.session().is_none());
}

#[test]
fn record_without_type_is_malformed() {
    let source = cookies(&[(USER_KEY, r#"{"email":"x@y.z"}"#), (TOKEN_KEY, "abc")]);
    assert!(matches!(read_session(&source), SessionLookup::Malformed(SessionParseError::MissingType)));
}

#[test]
fn cookie_jar_source_reads_values() {
    let jar = CookieJar::new().add(Cookie::new(USER_KEY, r#"{"type":"agent"}"#)).add(Cookie::new(TOKEN_KEY, "xyz"));
    let session = read_session(&jar).into_session().expect("session");
    assert_eq!(session.user.role.as_str(), "agent");
    assert_eq!(session.token, "xyz");
}

// =============================================================================
// encode_user_cookie
// =============================================================================

#[test]
fn encoded_cookie_reads_back() {
    let user = identity::parse_session_user(r#"{"type":"utilisateur","nom":"Zoé; Dupont"}"#).expect("user");
    let encoded = encode_user_cookie(&user);
    assert!(!encoded.contains(';'));
    assert!(!encoded.contains('"'));

    let source = cookies(&[(USER_KEY, encoded.as_str()), (TOKEN_KEY, "t")]);
    let session = read_session(&source).into_session().expect("session");
    assert_eq!(session.user, user);
}
