//! # Reconciliation Driver
//!
//! Drains the pending-action backlog against the server, oldest first.
//! Replay is retry-by-omission: an action that fails stays queued exactly
//! as it was and the pass moves on, so one bad action never blocks the rest
//! and nothing is lost to a flaky connection.
//!
//! When a queued create reconciles, the server-assigned id replaces the
//! local placeholder in the cache and in every still-queued action that
//! references it. Each action is re-read from the store right before replay
//! so a remap earlier in the same pass takes effect immediately.

pub mod service;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::model::EntityId;
use crate::offline::queue::{PendingAction, PendingOp};
use crate::offline::OfflineEngine;

pub use service::SyncService;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The backlog was already empty.
    NothingToSync,
    /// The engine is offline; nothing was attempted and the backlog is
    /// untouched.
    Offline,
    /// Every queued action reconciled.
    Synced,
    /// Some actions failed and remain queued for the next pass.
    Partial { remaining: usize },
}

/// Why a single action could not replay. The action stays queued in every
/// case except a successful replay.
#[derive(Debug, Error)]
enum ReplayError {
    /// The stored kind or payload did not decode. Likely written by a newer
    /// version of this crate; kept queued for that version to handle.
    #[error("unrecognized action: {0}")]
    UnknownAction(serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The action still references a local placeholder whose create has not
    /// reconciled, so it cannot be expressed to the server yet.
    #[error("depends on unsynced local entity {0}")]
    Unsynced(EntityId),
}

impl OfflineEngine {
    /// Run one reconciliation pass. Returns whether any replay was
    /// attempted; a no-op while offline or with an empty backlog is false.
    pub async fn sync(&self) -> bool {
        !matches!(
            self.sync_changes().await,
            SyncOutcome::NothingToSync | SyncOutcome::Offline
        )
    }

    /// Run one reconciliation pass and report how it went.
    pub async fn sync_changes(&self) -> SyncOutcome {
        let backlog = self.store.pending_ordered().await;
        if backlog.is_empty() {
            return SyncOutcome::NothingToSync;
        }
        if !self.is_online().await {
            debug!(pending = backlog.len(), "offline, skipping reconciliation");
            return SyncOutcome::Offline;
        }

        info!(pending = backlog.len(), "reconciling pending actions");
        let mut remaining = 0usize;
        for queued in backlog {
            // Re-read: an earlier create in this pass may have remapped this
            // action's payload, or a purge may have dropped it.
            let Some(action) = self.store.pending_action(&queued.id).await else {
                continue;
            };
            match self.replay_action(&action).await {
                Ok(()) => {
                    debug!(id = %action.id, kind = %action.kind, "action reconciled");
                    self.store.remove_pending(&action.id).await;
                }
                Err(e) => {
                    warn!(id = %action.id, kind = %action.kind, error = %e,
                        "action failed to reconcile, leaving queued");
                    remaining += 1;
                }
            }
        }

        *self.last_sync.write().await = Some(Utc::now());
        if remaining == 0 {
            info!("backlog fully reconciled");
            SyncOutcome::Synced
        } else {
            SyncOutcome::Partial { remaining }
        }
    }

    async fn replay_action(&self, action: &PendingAction) -> Result<(), ReplayError> {
        let op = PendingOp::from_action(action).map_err(ReplayError::UnknownAction)?;
        match op {
            PendingOp::CreateClient { local_id, body } => {
                let confirmed = self.api.create_client(&body).await?;
                // Server records always carry remote ids.
                if let Some(remote) = confirmed.id.remote() {
                    self.store.remap_pending_client(local_id, remote).await;
                }
                self.store.adopt_client(local_id, confirmed).await;
            }
            PendingOp::UpdateClient { id, patch } => {
                let remote = id.remote().ok_or(ReplayError::Unsynced(id))?;
                let confirmed = self.api.update_client(remote, &patch).await?;
                self.store.upsert_client(confirmed).await;
            }
            PendingOp::DeleteClient { id } => {
                let remote = id.remote().ok_or(ReplayError::Unsynced(id))?;
                self.api.delete_client(remote).await?;
            }
            PendingOp::CreateNote {
                local_id,
                client_id,
                body,
            } => {
                let parent = client_id.remote().ok_or(ReplayError::Unsynced(client_id))?;
                let confirmed = self.api.create_note(parent, &body).await?;
                if let Some(remote) = confirmed.id.remote() {
                    self.store.remap_pending_note(local_id, remote).await;
                }
                self.store.adopt_note(local_id, confirmed).await;
            }
            PendingOp::DeleteNote { id } => {
                let remote = id.remote().ok_or(ReplayError::Unsynced(id))?;
                self.api.delete_note(remote).await?;
            }
            PendingOp::CreateFollowup {
                local_id,
                client_id,
                body,
            } => {
                let parent = client_id.remote().ok_or(ReplayError::Unsynced(client_id))?;
                let confirmed = self.api.create_followup(parent, &body).await?;
                if let Some(remote) = confirmed.id.remote() {
                    self.store.remap_pending_followup(local_id, remote).await;
                }
                self.store.adopt_followup(local_id, confirmed).await;
            }
            PendingOp::UpdateFollowup { id, patch } => {
                let remote = id.remote().ok_or(ReplayError::Unsynced(id))?;
                let confirmed = self.api.update_followup(remote, &patch).await?;
                self.store.upsert_followup(confirmed).await;
            }
            PendingOp::CompleteFollowup { id } => {
                let remote = id.remote().ok_or(ReplayError::Unsynced(id))?;
                let confirmed = self.api.complete_followup(remote).await?;
                self.store.upsert_followup(confirmed).await;
            }
            PendingOp::DeleteFollowup { id } => {
                let remote = id.remote().ok_or(ReplayError::Unsynced(id))?;
                self.api.delete_followup(remote).await?;
            }
        }
        Ok(())
    }
}
