//! # Local Snapshot Store
//!
//! Durable cache of the four offline collections — clients, notes by client,
//! followups by client, pending actions — backed by a single SQLite
//! key-value table. The in-memory working set is authoritative at runtime;
//! every mutation triggers a full four-collection flush, trading efficiency
//! for simplicity at single-user data volumes.
//!
//! ## Durability model
//!
//! - `load` reads the four keys independently: a missing or corrupt value is
//!   logged and replaced with an empty collection, so one bad key never
//!   invalidates the other three and never aborts startup.
//! - `save` is best-effort: flush errors are logged and swallowed, a failed
//!   flush must not fail the mutation that triggered it.
//!
//! Per-collection accessors live in `clients.rs`, `notes.rs`, `followups.rs`
//! and `pending.rs`.

pub mod clients;
pub mod followups;
pub mod notes;
pub mod pending;

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::error::StoreError;
use crate::model::{Client, Followup, Note};
use crate::offline::queue::PendingAction;

/// Snapshot keys. Kept logically distinct so partial corruption of one
/// collection does not invalidate the others.
pub(crate) const KEY_CLIENTS: &str = "clients";
pub(crate) const KEY_NOTES: &str = "notes_by_client";
pub(crate) const KEY_FOLLOWUPS: &str = "followups_by_client";
pub(crate) const KEY_PENDING: &str = "pending_actions";

/// The in-memory working set. Notes and followups are bucketed by the
/// textual form of their parent client id.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
    pub clients: Vec<Client>,
    pub notes: BTreeMap<String, Vec<Note>>,
    pub followups: BTreeMap<String, Vec<Followup>>,
    pub pending: Vec<PendingAction>,
}

/// Local snapshot store.
#[derive(Debug)]
pub struct LocalStore {
    pool: SqlitePool,
    pub(crate) state: RwLock<CacheState>,
}

impl LocalStore {
    /// Open or create the snapshot database and load the working set.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&database_url).await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&pool)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS snapshot_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        let store = Self {
            pool,
            state: RwLock::new(CacheState::default()),
        };
        store.load().await?;
        Ok(store)
    }

    /// Reload the in-memory working set from the snapshot table.
    pub async fn load(&self) -> Result<(), StoreError> {
        let clients: Vec<Client> = self.load_key(KEY_CLIENTS).await?;
        let notes: BTreeMap<String, Vec<Note>> = self.load_key(KEY_NOTES).await?;
        let followups: BTreeMap<String, Vec<Followup>> = self.load_key(KEY_FOLLOWUPS).await?;
        let pending: Vec<PendingAction> = self.load_key(KEY_PENDING).await?;

        let mut state = self.state.write().await;
        state.clients = clients;
        state.notes = notes;
        state.followups = followups;
        state.pending = pending;
        Ok(())
    }

    /// Read one snapshot key, defaulting to empty on absence or corruption.
    async fn load_key<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        let row = sqlx::query("SELECT value FROM snapshot_kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(T::default());
        };
        let raw: String = row.try_get("value")?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "snapshot entry is corrupt, starting that collection empty");
                Ok(T::default())
            }
        }
    }

    /// Flush all four collections. Errors are logged, never propagated:
    /// durability is best-effort and callers report success to the UI
    /// without waiting on it.
    pub async fn save(&self) {
        if let Err(e) = self.try_save().await {
            error!(error = %e, "failed to flush snapshot");
        }
    }

    async fn try_save(&self) -> Result<(), StoreError> {
        let entries = {
            let state = self.state.read().await;
            [
                (KEY_CLIENTS, serde_json::to_string(&state.clients)?),
                (KEY_NOTES, serde_json::to_string(&state.notes)?),
                (KEY_FOLLOWUPS, serde_json::to_string(&state.followups)?),
                (KEY_PENDING, serde_json::to_string(&state.pending)?),
            ]
        };

        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(
                "INSERT INTO snapshot_kv (key, value, updated_at)
                 VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Close the underlying pool, flushing first. Mostly useful in tests
    /// that reopen the same file.
    pub async fn close(&self) {
        self.save().await;
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClientStatus, EntityId, NewClient, NewNote};
    use crate::offline::queue::PendingOp;
    use pretty_assertions::assert_eq;

    fn sample_client(id: EntityId, name: &str) -> Client {
        NewClient {
            name: name.to_string(),
            phone: None,
            email: None,
            address: None,
            status: ClientStatus::Lead,
        }
        .into_local_client(id, 1, chrono::Utc::now())
    }

    #[tokio::test]
    async fn test_open_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(&dir.path().join("cache.db")).await.unwrap();
        assert!(store.cached_clients(None).await.is_empty());
        assert_eq!(store.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let store = LocalStore::open(&path).await.unwrap();
        let client = sample_client(EntityId::Remote(1), "Ann");
        store.upsert_client(client.clone()).await;
        store
            .upsert_note(
                NewNote {
                    body: "called about deck".to_string(),
                    photo_url: None,
                }
                .into_local_note(EntityId::Local(5), EntityId::Remote(1), chrono::Utc::now()),
            )
            .await;
        let action_id = store
            .enqueue_pending(PendingOp::DeleteClient {
                id: EntityId::Remote(2),
            })
            .await;
        store.close().await;

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.cached_clients(None).await, vec![client]);
        assert_eq!(reopened.cached_notes(EntityId::Remote(1)).await.len(), 1);
        let pending = reopened.pending_ordered().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, action_id);
    }

    #[tokio::test]
    async fn test_corrupt_key_does_not_invalidate_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let store = LocalStore::open(&path).await.unwrap();
        store
            .upsert_client(sample_client(EntityId::Remote(1), "Ann"))
            .await;
        store.save().await;

        // Corrupt one collection behind the store's back.
        sqlx::query("UPDATE snapshot_kv SET value = 'not json' WHERE key = ?")
            .bind(KEY_NOTES)
            .execute(&store.pool)
            .await
            .unwrap();

        store.load().await.unwrap();
        assert_eq!(store.cached_clients(None).await.len(), 1);
        assert!(store.cached_notes(EntityId::Remote(1)).await.is_empty());
    }
}
