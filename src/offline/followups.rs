//! Followup operations, including the dedicated completion transition.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::model::{EntityId, Followup, FollowupPatch, NewFollowup};
use crate::offline::queue::PendingOp;

use super::OfflineEngine;

impl OfflineEngine {
    /// List followups across all clients, optionally restricted to today's.
    pub async fn followups(&self, today: bool) -> Vec<Followup> {
        if self.is_online().await {
            match self.api.list_followups(today).await {
                Ok(followups) => {
                    // The today view is a subset; merging keeps the rest of
                    // the cached collection intact.
                    if today {
                        self.store.upsert_followups(followups).await;
                    } else {
                        self.store.put_all_followups(followups).await;
                    }
                    // Merged view: followups created offline and still
                    // queued stay visible.
                    return self.store.cached_followups(today).await;
                }
                Err(e) => {
                    warn!(error = %e, "followup list failed, serving cached data");
                }
            }
        }
        self.store.cached_followups(today).await
    }

    /// List one client's followups.
    pub async fn client_followups(&self, client_id: EntityId) -> Vec<Followup> {
        if self.is_online().await {
            if let Some(remote) = client_id.remote() {
                match self.api.list_client_followups(remote).await {
                    Ok(followups) => {
                        self.store
                            .put_client_followups(client_id, followups)
                            .await;
                        return self.store.cached_client_followups(client_id).await;
                    }
                    Err(e) => {
                        warn!(error = %e, %client_id, "followup list failed, serving cached data");
                    }
                }
            }
        }
        self.store.cached_client_followups(client_id).await
    }

    /// Schedule a followup for a client.
    pub async fn create_followup(&self, client_id: EntityId, body: NewFollowup) -> Followup {
        if self.is_online().await {
            if let Some(remote) = client_id.remote() {
                match self.api.create_followup(remote, &body).await {
                    Ok(followup) => {
                        self.store.upsert_followup(followup.clone()).await;
                        return followup;
                    }
                    Err(e) => {
                        warn!(error = %e, %client_id, "followup create failed, queueing for sync");
                    }
                }
            }
        }

        let local = self.ids.allocate_value();
        let followup = body
            .clone()
            .into_local_followup(EntityId::Local(local), client_id, Utc::now());
        self.store.upsert_followup(followup.clone()).await;
        self.store
            .enqueue_pending(PendingOp::CreateFollowup {
                local_id: local,
                client_id,
                body,
            })
            .await;
        info!(id = %followup.id, %client_id, "followup created offline");
        followup
    }

    /// Apply a partial update. Completion is not patchable; it goes through
    /// [`Self::complete_followup`].
    pub async fn update_followup(
        &self,
        id: EntityId,
        patch: FollowupPatch,
    ) -> Result<Followup, EngineError> {
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.update_followup(remote, &patch).await {
                    Ok(followup) => {
                        self.store.upsert_followup(followup.clone()).await;
                        return Ok(followup);
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "followup update failed, queueing for sync");
                    }
                }
            }
        }

        let Some(mut followup) = self.store.cached_followup(id).await else {
            return Err(EngineError::NotFound {
                entity: "followup",
                id,
            });
        };
        patch.apply(&mut followup);
        self.store.upsert_followup(followup.clone()).await;
        self.store
            .enqueue_pending(PendingOp::UpdateFollowup { id, patch })
            .await;
        Ok(followup)
    }

    /// Mark a followup done.
    pub async fn complete_followup(&self, id: EntityId) -> Result<Followup, EngineError> {
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.complete_followup(remote).await {
                    Ok(followup) => {
                        self.store.upsert_followup(followup.clone()).await;
                        return Ok(followup);
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "followup completion failed, queueing for sync");
                    }
                }
            }
        }

        let Some(mut followup) = self.store.cached_followup(id).await else {
            return Err(EngineError::NotFound {
                entity: "followup",
                id,
            });
        };
        followup.completed = true;
        self.store.upsert_followup(followup.clone()).await;
        self.store
            .enqueue_pending(PendingOp::CompleteFollowup { id })
            .await;
        Ok(followup)
    }

    /// Delete a followup.
    pub async fn delete_followup(&self, id: EntityId) -> Result<(), EngineError> {
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.delete_followup(remote).await {
                    Ok(()) => {
                        if let Some(followup) = self.store.cached_followup(id).await {
                            self.store.remove_followup(followup.client_id, id).await;
                        }
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "followup delete failed, queueing for sync");
                    }
                }
            }
        }

        let Some(followup) = self.store.cached_followup(id).await else {
            return Err(EngineError::NotFound {
                entity: "followup",
                id,
            });
        };
        self.store.remove_followup(followup.client_id, id).await;
        match id {
            EntityId::Local(local) => {
                self.store.purge_pending_local_followup(local).await;
            }
            EntityId::Remote(_) => {
                self.store
                    .enqueue_pending(PendingOp::DeleteFollowup { id })
                    .await;
            }
        }
        info!(%id, "followup deleted");
        Ok(())
    }
}
