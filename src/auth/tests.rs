//! Tests for the auth module

use super::*;
use crate::error::Error;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let req = reqwest::Client::new().get("https://example.com/api");

    let built = auth.apply(req).await.unwrap().build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[tokio::test]
async fn test_bearer_auth() {
    let auth = Authenticator::new(AuthConfig::from_token(Some("my-bearer-token")));
    let req = reqwest::Client::new().get("https://example.com/api");

    let built = auth.apply(req).await.unwrap().build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-bearer-token"
    );
}

#[tokio::test]
async fn test_session_login_and_caching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "admin@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "token": "session-token",
            "role": "ADMIN",
            "username": "admin"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::session("admin@example.com", "secret"))
        .with_base_url(Some(mock_server.uri()));
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let req = auth.apply(client.get("https://example.com/api")).await.unwrap();
        let built = req.build().unwrap();
        assert_eq!(
            built.headers().get("Authorization").unwrap(),
            "Bearer session-token"
        );
    }
}

#[tokio::test]
async fn test_session_relogs_after_invalidate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "t"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::session("a@b.c", "pw"))
        .with_base_url(Some(mock_server.uri()));
    let client = reqwest::Client::new();

    auth.apply(client.get("https://example.com")).await.unwrap();
    auth.invalidate().await;
    auth.apply(client.get("https://example.com")).await.unwrap();
}

#[tokio::test]
async fn test_session_login_failure_uses_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Invalid credentials" })),
        )
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::session("a@b.c", "wrong"))
        .with_base_url(Some(mock_server.uri()));

    let err = auth
        .apply(reqwest::Client::new().get("https://example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { ref message } if message == "Invalid credentials"));
}

#[tokio::test]
async fn test_session_response_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1 })))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::session("a@b.c", "pw"))
        .with_base_url(Some(mock_server.uri()));

    let err = auth
        .apply(reqwest::Client::new().get("https://example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}

#[tokio::test]
async fn test_session_requires_credentials() {
    let auth = Authenticator::new(AuthConfig::session("", ""));
    let err = auth
        .apply(reqwest::Client::new().get("https://example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { ref message } if message.contains("required")));
}
