//! Integration tests for the document client, list store, and
//! subscription using wiremock.

use std::sync::Arc;
use std::time::Duration;

use taskpulse_core::Session;
use taskpulse_store::{
    DocumentClient, DocumentSubscription, ListStore, StoreError, SCHEMA_VERSION,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session {
    Session::new("uid-1", "alice@example.com", "token-abc")
}

fn legacy_errands_doc() -> serde_json::Value {
    serde_json::json!({
        "task1": [{
            "id": "task1",
            "name": "Errands",
            "color": "#8022D9",
            "todos": []
        }]
    })
}

#[tokio::test]
async fn test_get_migrates_legacy_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_errands_doc()))
        .mount(&mock_server)
        .await;

    let client = DocumentClient::new(&mock_server.uri()).unwrap();
    let doc = client.get(&session()).await.unwrap().unwrap();

    assert_eq!(doc.schema_version, SCHEMA_VERSION);
    let flat = doc.flattened();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].id, "task1");
    assert_eq!(flat[0].name, "Errands");
    assert_eq!(flat[0].color, "#8022D9");
    assert!(flat[0].todos.is_empty());
}

#[tokio::test]
async fn test_get_missing_document_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = DocumentClient::new(&mock_server.uri()).unwrap();
    assert!(client.get(&session()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_list_persists_then_appends() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = Arc::new(DocumentClient::new(&mock_server.uri()).unwrap());
    let store = ListStore::new(client, session());

    let first = store.add_list("Errands", "#8022D9").await.unwrap();
    let second = store.add_list("Groceries", "#595BD4").await.unwrap();

    // Generated keys, not count-derived: unique even across adds.
    assert_ne!(first.id, second.id);
    assert!(first.id.starts_with("list-"));

    let lists = store.lists();
    assert_eq!(lists.len(), 2);
    // Adding the second list didn't mutate the first.
    assert_eq!(lists[0], first);
    assert_eq!(lists[1].name, "Groceries");

    // Each add was one single-field merge carrying its own key.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["lists"][&first.id].is_object());
}

#[tokio::test]
async fn test_add_list_failure_leaves_local_state_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = Arc::new(DocumentClient::new(&mock_server.uri()).unwrap());
    let store = ListStore::new(client, session());

    let result = store.add_list("Errands", "#8022D9").await;
    match result {
        Err(StoreError::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_subscription_publishes_then_flags_stale_on_failure() {
    let mock_server = MockServer::start().await;

    // First poll succeeds, everything after fails.
    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_errands_doc()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = DocumentClient::new(&mock_server.uri()).unwrap();
    let subscription =
        DocumentSubscription::open(client, session(), Duration::from_millis(50));
    let mut rx = subscription.snapshots();

    // First successful poll.
    rx.changed().await.unwrap();
    {
        let snapshot = rx.borrow();
        assert!(!snapshot.stale);
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.lists[0].name, "Errands");
    }

    // Poll failure: previous data survives but is flagged stale.
    rx.changed().await.unwrap();
    {
        let snapshot = rx.borrow();
        assert!(snapshot.stale);
        assert_eq!(snapshot.lists.len(), 1);
    }

    subscription.close().await;
}

#[tokio::test]
async fn test_subscription_creates_missing_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "lists": {}
        })))
        .mount(&mock_server)
        .await;

    let client = DocumentClient::new(&mock_server.uri()).unwrap();
    let subscription =
        DocumentSubscription::open(client, session(), Duration::from_millis(50));
    let mut rx = subscription.snapshots();

    rx.changed().await.unwrap();
    {
        let snapshot = rx.borrow();
        assert!(!snapshot.stale);
        assert!(snapshot.lists.is_empty());
    }

    subscription.close().await;
}

#[tokio::test]
async fn test_store_syncs_from_subscription() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/notes/uid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_errands_doc()))
        .mount(&mock_server)
        .await;

    let client = Arc::new(DocumentClient::new(&mock_server.uri()).unwrap());
    let store = Arc::new(ListStore::new(Arc::clone(&client), session()));

    let subscription = DocumentSubscription::open(
        DocumentClient::new(&mock_server.uri()).unwrap(),
        session(),
        Duration::from_millis(50),
    );

    let mut rx = subscription.snapshots();
    rx.changed().await.unwrap();

    let sync_store = Arc::clone(&store);
    let sync = tokio::spawn(async move {
        sync_store.sync_from(rx).await;
    });

    // Give the sync task a moment to apply the published snapshot.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let lists = store.lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].name, "Errands");

    subscription.close().await;
    sync.abort();
}
