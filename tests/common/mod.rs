//! Common test utilities and helpers
//!
//! Shared across the integration suites: a mock-server-backed engine
//! builder and JSON fixtures shaped like the CRM backend's responses.

#![allow(dead_code)]

use std::sync::Once;

use jobsync::{EngineConfig, NewClient, NewFollowup, NewNote, OfflineEngine};
use serde_json::{json, Value};
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Route engine logs through the test harness, honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build an engine whose API URL points at the mock server and whose
/// snapshot lives in the given temp dir.
pub async fn engine_for(server: &MockServer, dir: &tempfile::TempDir) -> OfflineEngine {
    init_tracing();
    let config = EngineConfig::builder()
        .api_url(server.uri())
        .token("test-token")
        .owner_id(1)
        .data_dir(dir.path())
        .build()
        .unwrap();
    OfflineEngine::new(config).await.unwrap()
}

pub fn client_json(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "owner_id": 1,
        "name": name,
        "status": status,
        "created_at": "2026-01-10T08:00:00Z",
        "updated_at": "2026-01-10T08:00:00Z"
    })
}

pub fn note_json(id: i64, client_id: i64, body: &str) -> Value {
    json!({
        "id": id,
        "client_id": client_id,
        "body": body,
        "created_at": "2026-01-10T08:00:00Z"
    })
}

pub fn followup_json(id: i64, client_id: i64, action: &str) -> Value {
    json!({
        "id": id,
        "client_id": client_id,
        "action": action,
        "scheduled_at": "2026-02-01T12:00:00Z",
        "created_at": "2026-01-10T08:00:00Z"
    })
}

pub fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
        status: Default::default(),
    }
}

pub fn new_note(body: &str) -> NewNote {
    NewNote {
        body: body.to_string(),
        photo_url: None,
    }
}

pub fn new_followup(action: &str) -> NewFollowup {
    NewFollowup {
        action: action.to_string(),
        scheduled_at: chrono::Utc::now() + chrono::Duration::days(1),
        remind: false,
    }
}
