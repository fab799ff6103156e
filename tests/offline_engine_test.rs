//! Offline mediation integration tests
//!
//! Exercise the engine against a mock backend: network-first reads with
//! cache fallback, optimistic offline writes, and the errors surfaced for
//! targets absent from the cache.

mod common;

use common::*;
use jobsync::{ClientPatch, ClientStatus, EngineError, EntityId};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_offline_create_is_visible_immediately() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;

    let created = engine.create_client(new_client("Ann Doyle")).await;
    assert!(created.id.is_local());

    let clients = engine.clients(None).await;
    assert_eq!(clients, vec![created]);
    assert_eq!(engine.pending_count().await, 1);
}

#[tokio::test]
async fn test_read_falls_back_to_cache_when_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([client_json(1, "Ann", "lead")])),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    assert_eq!(engine.clients(None).await.len(), 1);

    // The server starts failing; the cached copy keeps serving.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let clients = engine.clients(None).await;
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Ann");
}

#[tokio::test]
async fn test_filtered_read_does_not_clobber_other_clients() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("status", "paid"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([client_json(2, "Bob", "paid")])),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;
    engine.create_client(new_client("Ann Doyle")).await;
    engine.set_online(true).await;

    let paid = engine.clients(Some(ClientStatus::Paid)).await;
    assert_eq!(paid.len(), 1);
    // Ann, outside the filter, is still cached alongside Bob.
    assert_eq!(engine.clients(None).await.len(), 2);
}

#[tokio::test]
async fn test_list_refresh_keeps_unreconciled_offline_create() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;
    let created = engine.create_client(new_client("Ann Doyle")).await;

    // The server does not know the offline create yet; a refresh must not
    // make it vanish while its action is still queued.
    engine.set_online(true).await;
    assert_eq!(engine.clients(None).await, vec![created]);
    assert_eq!(engine.pending_count().await, 1);
}

#[tokio::test]
async fn test_update_of_unknown_client_is_not_found() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;

    let result = engine
        .update_client(
            EntityId::Remote(99),
            ClientPatch {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(EngineError::NotFound { .. })));
    // Nothing is queued for a logic error.
    assert_eq!(engine.pending_count().await, 0);
}

#[tokio::test]
async fn test_delete_of_unknown_note_is_not_found() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;

    let result = engine
        .delete_note(EntityId::Remote(1), EntityId::Remote(5))
        .await;
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
    assert_eq!(engine.pending_count().await, 0);
}

#[tokio::test]
async fn test_offline_update_applies_patch_and_queues() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;

    let created = engine.create_client(new_client("Ann Doyle")).await;
    let updated = engine
        .update_client(
            created.id,
            ClientPatch {
                status: Some(ClientStatus::Quoted),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, ClientStatus::Quoted);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(engine.pending_count().await, 2);
}

#[tokio::test]
async fn test_deleting_local_only_client_leaves_no_backlog() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;

    let client = engine.create_client(new_client("Ann Doyle")).await;
    engine.create_note(client.id, new_note("met on site")).await;
    engine
        .create_followup(client.id, new_followup("send quote"))
        .await;
    assert_eq!(engine.pending_count().await, 3);

    engine.delete_client(client.id).await.unwrap();

    // The create and everything depending on it became moot.
    assert_eq!(engine.pending_count().await, 0);
    assert!(engine.clients(None).await.is_empty());
    assert!(engine.notes(client.id).await.is_empty());
}

#[tokio::test]
async fn test_offline_complete_followup() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;

    let client = engine.create_client(new_client("Ann Doyle")).await;
    let followup = engine
        .create_followup(client.id, new_followup("send quote"))
        .await;
    assert!(!followup.completed);

    let completed = engine.complete_followup(followup.id).await.unwrap();
    assert!(completed.completed);
    assert_eq!(engine.pending_count().await, 3);
}

#[tokio::test]
async fn test_cache_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let engine = engine_for(&server, &dir).await;
        engine.set_online(false).await;
        let client = engine.create_client(new_client("Ann Doyle")).await;
        engine.store().close().await;
        client
    };

    let engine = engine_for(&server, &dir).await;
    engine.set_online(false).await;
    assert_eq!(engine.clients(None).await, vec![created]);
    assert_eq!(engine.pending_count().await, 1);
}
