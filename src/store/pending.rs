//! Pending-action backlog.
//!
//! The ordered log of mutations that could not be confirmed against the
//! network. Appended by the offline mediation layer, drained by the sync
//! driver, persisted with the rest of the snapshot on every change.

use tracing::debug;

use crate::offline::queue::{order_by_queue_time, PendingAction, PendingOp};

use super::LocalStore;

impl LocalStore {
    /// Queue an operation for later replay. Returns the action id.
    pub async fn enqueue_pending(&self, op: PendingOp) -> String {
        let action = PendingAction::record(&op);
        let id = action.id.clone();
        debug!(id = %id, kind = %action.kind, "queueing pending action");
        self.enqueue_action(action).await;
        id
    }

    /// Append an already-built action.
    pub async fn enqueue_action(&self, action: PendingAction) {
        {
            let mut state = self.state.write().await;
            state.pending.push(action);
        }
        self.save().await;
    }

    /// Remove an action by id. Idempotent: removing an absent id is a no-op.
    pub async fn remove_pending(&self, id: &str) {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.pending.len();
            state.pending.retain(|action| action.id != id);
            state.pending.len() != before
        };
        if removed {
            self.save().await;
        }
    }

    /// Snapshot of the backlog ordered by creation time, oldest first.
    /// Callers re-invoke for a fresh snapshot.
    pub async fn pending_ordered(&self) -> Vec<PendingAction> {
        let state = self.state.read().await;
        order_by_queue_time(state.pending.clone())
    }

    /// Current copy of one action, if it is still queued. The sync driver
    /// re-reads each action right before replay so that a remap or purge
    /// performed earlier in the same pass is visible.
    pub async fn pending_action(&self, id: &str) -> Option<PendingAction> {
        let state = self.state.read().await;
        state.pending.iter().find(|action| action.id == id).cloned()
    }

    /// Number of queued actions.
    pub async fn pending_count(&self) -> usize {
        let state = self.state.read().await;
        state.pending.len()
    }

    /// Rewrite queued references to a locally created client once its
    /// server id is known. Actions that do not decode are left untouched.
    pub async fn remap_pending_client(&self, local: i64, remote: i64) {
        self.remap_pending(|op| op.remap_client(local, remote)).await;
    }

    /// As above, for a locally created note.
    pub async fn remap_pending_note(&self, local: i64, remote: i64) {
        self.remap_pending(|op| op.remap_note(local, remote)).await;
    }

    /// As above, for a locally created followup.
    pub async fn remap_pending_followup(&self, local: i64, remote: i64) {
        self.remap_pending(|op| op.remap_followup(local, remote)).await;
    }

    async fn remap_pending(&self, remap: impl Fn(&mut PendingOp)) {
        let mut changed = false;
        {
            let mut state = self.state.write().await;
            for action in &mut state.pending {
                let Ok(mut op) = PendingOp::from_action(action) else {
                    continue;
                };
                remap(&mut op);
                let rewritten = PendingAction::record(&op);
                if rewritten.payload != action.payload {
                    action.payload = rewritten.payload;
                    changed = true;
                }
            }
        }
        if changed {
            self.save().await;
        }
    }

    /// Drop every action that created, or depended on, a locally created
    /// client that was deleted before it ever reached the server. There is
    /// nothing to replay: the server never heard of it.
    pub async fn purge_pending_local_client(&self, local: i64) {
        self.purge_pending(|op| op.references_local_client(local))
            .await;
    }

    /// As above, for a locally created note.
    pub async fn purge_pending_local_note(&self, local: i64) {
        self.purge_pending(|op| op.references_local_note(local)).await;
    }

    /// As above, for a locally created followup.
    pub async fn purge_pending_local_followup(&self, local: i64) {
        self.purge_pending(|op| op.references_local_followup(local))
            .await;
    }

    async fn purge_pending(&self, matches: impl Fn(&PendingOp) -> bool) {
        let purged = {
            let mut state = self.state.write().await;
            let before = state.pending.len();
            state.pending.retain(|action| {
                PendingOp::from_action(action).map_or(true, |op| !matches(&op))
            });
            before - state.pending.len()
        };
        if purged > 0 {
            debug!(purged, "dropped pending actions for a local-only entity");
            self.save().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityId, NewNote};
    use pretty_assertions::assert_eq;

    async fn open_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(&dir.path().join("cache.db")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, store) = open_store().await;
        let id = store
            .enqueue_pending(PendingOp::DeleteClient {
                id: EntityId::Remote(1),
            })
            .await;

        store.remove_pending(&id).await;
        assert_eq!(store.pending_count().await, 0);
        // Removing again is a no-op, not an error.
        store.remove_pending(&id).await;
        assert_eq!(store.pending_count().await, 0);
        store.remove_pending("never-existed").await;
    }

    #[tokio::test]
    async fn test_ordered_snapshot_is_oldest_first() {
        let (_dir, store) = open_store().await;
        let first = store
            .enqueue_pending(PendingOp::DeleteClient {
                id: EntityId::Remote(1),
            })
            .await;
        let second = store
            .enqueue_pending(PendingOp::DeleteClient {
                id: EntityId::Remote(2),
            })
            .await;

        let ordered = store.pending_ordered().await;
        assert_eq!(ordered[0].id, first);
        assert_eq!(ordered[1].id, second);
    }

    #[tokio::test]
    async fn test_remap_rewrites_persisted_payloads() {
        let (_dir, store) = open_store().await;
        store
            .enqueue_pending(PendingOp::CreateNote {
                local_id: 3,
                client_id: EntityId::Local(7),
                body: NewNote {
                    body: "hello".to_string(),
                    photo_url: None,
                },
            })
            .await;

        store.remap_pending_client(7, 42).await;

        let ordered = store.pending_ordered().await;
        let op = PendingOp::from_action(&ordered[0]).unwrap();
        assert!(matches!(
            op,
            PendingOp::CreateNote {
                client_id: EntityId::Remote(42),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_purge_drops_dependents_but_not_others() {
        let (_dir, store) = open_store().await;
        store
            .enqueue_pending(PendingOp::CreateNote {
                local_id: 3,
                client_id: EntityId::Local(7),
                body: NewNote {
                    body: "doomed".to_string(),
                    photo_url: None,
                },
            })
            .await;
        store
            .enqueue_pending(PendingOp::DeleteClient {
                id: EntityId::Remote(9),
            })
            .await;

        store.purge_pending_local_client(7).await;

        let ordered = store.pending_ordered().await;
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].kind, "delete_client");
    }
}
