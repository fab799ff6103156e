//! Cached client collection.

use crate::model::{Client, ClientStatus, EntityId};

use super::LocalStore;

impl LocalStore {
    /// Cached clients, optionally filtered by status.
    pub async fn cached_clients(&self, status: Option<ClientStatus>) -> Vec<Client> {
        let state = self.state.read().await;
        state
            .clients
            .iter()
            .filter(|client| status.map_or(true, |s| client.status == s))
            .cloned()
            .collect()
    }

    /// Cached client by id.
    pub async fn cached_client(&self, id: EntityId) -> Option<Client> {
        let state = self.state.read().await;
        state.clients.iter().find(|client| client.id == id).cloned()
    }

    /// Replace the server-owned part of the cached collection, after an
    /// unfiltered server read. Clients created offline whose create actions
    /// have not reconciled are kept; the server does not know them yet.
    pub async fn put_clients(&self, clients: Vec<Client>) {
        {
            let mut state = self.state.write().await;
            state.clients.retain(|client| client.id.is_local());
            state.clients.extend(clients);
        }
        self.save().await;
    }

    /// Insert or replace a single client.
    pub async fn upsert_client(&self, client: Client) {
        {
            let mut state = self.state.write().await;
            state.clients.retain(|existing| existing.id != client.id);
            state.clients.push(client);
        }
        self.save().await;
    }

    /// Insert or replace several clients, after a filtered server read that
    /// must not discard clients outside the filter.
    pub async fn upsert_clients(&self, clients: Vec<Client>) {
        {
            let mut state = self.state.write().await;
            for client in clients {
                state.clients.retain(|existing| existing.id != client.id);
                state.clients.push(client);
            }
        }
        self.save().await;
    }

    /// Remove a client and its dependent note/followup buckets. Returns
    /// whether the client was present.
    pub async fn remove_client(&self, id: EntityId) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.clients.len();
            state.clients.retain(|client| client.id != id);
            let key = id.to_string();
            state.notes.remove(&key);
            state.followups.remove(&key);
            state.clients.len() != before
        };
        if removed {
            self.save().await;
        }
        removed
    }

    /// Rewrite a locally created client to its server-assigned record once
    /// the create action reconciles: the client entry is replaced and the
    /// dependent note/followup buckets move to the new id.
    pub async fn adopt_client(&self, local: i64, confirmed: Client) {
        let local_id = EntityId::Local(local);
        let remote_id = confirmed.id;
        {
            let mut state = self.state.write().await;
            state
                .clients
                .retain(|client| client.id != local_id && client.id != remote_id);
            state.clients.push(confirmed);

            let old_key = local_id.to_string();
            let new_key = remote_id.to_string();
            if let Some(mut notes) = state.notes.remove(&old_key) {
                for note in &mut notes {
                    note.client_id = remote_id;
                }
                state.notes.entry(new_key.clone()).or_default().extend(notes);
            }
            if let Some(mut followups) = state.followups.remove(&old_key) {
                for followup in &mut followups {
                    followup.client_id = remote_id;
                }
                state.followups.entry(new_key).or_default().extend(followups);
            }
        }
        self.save().await;
    }
}
