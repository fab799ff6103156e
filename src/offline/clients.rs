//! Client operations: network-first reads, optimistic offline writes.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::model::{Client, ClientPatch, ClientStatus, EntityId, NewClient};
use crate::offline::queue::PendingOp;

use super::OfflineEngine;

impl OfflineEngine {
    /// List clients, optionally filtered by status. Server copy when
    /// reachable, cached copy otherwise.
    pub async fn clients(&self, status: Option<ClientStatus>) -> Vec<Client> {
        if self.is_online().await {
            match self.api.list_clients(status).await {
                Ok(clients) => {
                    // A filtered read must not discard clients outside the
                    // filter, so it merges instead of replacing.
                    if status.is_none() {
                        self.store.put_clients(clients).await;
                    } else {
                        self.store.upsert_clients(clients).await;
                    }
                    // The merged view keeps clients created offline that
                    // the server has not confirmed yet.
                    return self.store.cached_clients(status).await;
                }
                Err(e) => {
                    warn!(error = %e, "client list failed, serving cached data");
                }
            }
        }
        self.store.cached_clients(status).await
    }

    /// Fetch one client by id.
    pub async fn client(&self, id: EntityId) -> Option<Client> {
        // A Local id has never reached the server, so only the cache can
        // answer for it.
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.get_client(remote).await {
                    Ok(client) => {
                        self.store.upsert_client(client.clone()).await;
                        return Some(client);
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "client fetch failed, serving cached data");
                    }
                }
            }
        }
        self.store.cached_client(id).await
    }

    /// Create a client. Offline, the returned record carries a `Local`
    /// placeholder id until the queued create reconciles.
    pub async fn create_client(&self, body: NewClient) -> Client {
        if self.is_online().await {
            match self.api.create_client(&body).await {
                Ok(client) => {
                    self.store.upsert_client(client.clone()).await;
                    return client;
                }
                Err(e) => {
                    warn!(error = %e, "client create failed, queueing for sync");
                }
            }
        }

        let local = self.ids.allocate_value();
        let client = body
            .clone()
            .into_local_client(EntityId::Local(local), self.config().owner_id(), Utc::now());
        self.store.upsert_client(client.clone()).await;
        self.store
            .enqueue_pending(PendingOp::CreateClient {
                local_id: local,
                body,
            })
            .await;
        info!(id = %client.id, "client created offline");
        client
    }

    /// Apply a partial update. Offline, the patch is merged into the cached
    /// record and queued; a target absent from the cache is a logic error
    /// and nothing is queued.
    pub async fn update_client(
        &self,
        id: EntityId,
        patch: ClientPatch,
    ) -> Result<Client, EngineError> {
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.update_client(remote, &patch).await {
                    Ok(client) => {
                        self.store.upsert_client(client.clone()).await;
                        return Ok(client);
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "client update failed, queueing for sync");
                    }
                }
            }
        }

        let Some(mut client) = self.store.cached_client(id).await else {
            return Err(EngineError::NotFound {
                entity: "client",
                id,
            });
        };
        patch.apply(&mut client, Utc::now());
        self.store.upsert_client(client.clone()).await;
        self.store
            .enqueue_pending(PendingOp::UpdateClient { id, patch })
            .await;
        Ok(client)
    }

    /// Delete a client and its cached notes and followups.
    pub async fn delete_client(&self, id: EntityId) -> Result<(), EngineError> {
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.delete_client(remote).await {
                    Ok(()) => {
                        self.store.remove_client(id).await;
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "client delete failed, queueing for sync");
                    }
                }
            }
        }

        if !self.store.remove_client(id).await {
            return Err(EngineError::NotFound {
                entity: "client",
                id,
            });
        }
        match id {
            // The server never heard of a local-only client; dropping its
            // queued create (and anything depending on it) is the whole
            // deletion.
            EntityId::Local(local) => {
                self.store.purge_pending_local_client(local).await;
            }
            EntityId::Remote(_) => {
                self.store
                    .enqueue_pending(PendingOp::DeleteClient { id })
                    .await;
            }
        }
        Ok(())
    }
}
