//! Integration tests for ProfileClient using wiremock.

use taskpulse_core::Session;
use taskpulse_profile::{ProfileClient, ProfileError, ProfileRecord, UserRecord};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session {
    Session::new("uid-1", "alice@example.com", "token-abc")
}

#[tokio::test]
async fn test_get_user_sends_bearer_and_drops_legacy_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/uid-1"))
        .and(header("Authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "plaintext-from-legacy-doc"
        })))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    let user = client.get_user(&session(), "uid-1").await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    // The record type simply has nowhere to put a password.
    assert!(!serde_json::to_string(&user).unwrap().contains("password"));
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/uid-missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    let result = client.get_user(&session(), "uid-missing").await;

    assert!(matches!(result, Err(ProfileError::NotFound(_))));
}

#[tokio::test]
async fn test_put_user_never_sends_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/users/uid-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    let record = UserRecord {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
    };
    client.put_user(&session(), "uid-1", &record).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(!body.contains("password"));
}

#[tokio::test]
async fn test_lookup_email_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [{ "username": "alice", "email": "alice@example.com" }]
        })))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    let email = client.lookup_email("alice").await.unwrap();

    assert_eq!(email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn test_lookup_email_no_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": []
        })))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    let email = client.lookup_email("nobody").await.unwrap();

    assert!(email.is_none());
}

#[tokio::test]
async fn test_missing_profile_is_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/profile/uid-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    let profile = client.get_profile(&session(), "uid-1").await.unwrap();

    assert_eq!(profile, ProfileRecord::default());
}

#[tokio::test]
async fn test_put_and_get_profile() {
    let mock_server = MockServer::start().await;

    let record = ProfileRecord {
        about: "Rustacean".to_string(),
        skills: vec!["rust".to_string(), "sql".to_string()],
        image_url: Some("https://example.com/alice.png".to_string()),
    };

    Mock::given(method("PUT"))
        .and(path("/v1/profile/uid-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/profile/uid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(&mock_server.uri()).unwrap();
    client.put_profile(&session(), "uid-1", &record).await.unwrap();
    let fetched = client.get_profile(&session(), "uid-1").await.unwrap();

    assert_eq!(fetched, record);
}
