//! Note operations. Notes are create-and-delete only; there is no update.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::model::{EntityId, NewNote, Note};
use crate::offline::queue::PendingOp;

use super::OfflineEngine;

impl OfflineEngine {
    /// List a client's notes. Server copy when reachable, cached copy
    /// otherwise.
    pub async fn notes(&self, client_id: EntityId) -> Vec<Note> {
        if self.is_online().await {
            if let Some(remote) = client_id.remote() {
                match self.api.list_notes(remote).await {
                    Ok(notes) => {
                        self.store.put_notes(client_id, notes).await;
                        // Merged view: notes created offline and still
                        // queued stay visible.
                        return self.store.cached_notes(client_id).await;
                    }
                    Err(e) => {
                        warn!(error = %e, %client_id, "note list failed, serving cached data");
                    }
                }
            }
        }
        self.store.cached_notes(client_id).await
    }

    /// Add a note to a client. A parent with a `Local` id has not reached
    /// the server yet, so the note is queued behind it regardless of
    /// connectivity.
    pub async fn create_note(&self, client_id: EntityId, body: NewNote) -> Note {
        if self.is_online().await {
            if let Some(remote) = client_id.remote() {
                match self.api.create_note(remote, &body).await {
                    Ok(note) => {
                        self.store.upsert_note(note.clone()).await;
                        return note;
                    }
                    Err(e) => {
                        warn!(error = %e, %client_id, "note create failed, queueing for sync");
                    }
                }
            }
        }

        let local = self.ids.allocate_value();
        let note = body
            .clone()
            .into_local_note(EntityId::Local(local), client_id, Utc::now());
        self.store.upsert_note(note.clone()).await;
        self.store
            .enqueue_pending(PendingOp::CreateNote {
                local_id: local,
                client_id,
                body,
            })
            .await;
        info!(id = %note.id, %client_id, "note created offline");
        note
    }

    /// Delete a note from a client.
    pub async fn delete_note(&self, client_id: EntityId, id: EntityId) -> Result<(), EngineError> {
        if self.is_online().await {
            if let Some(remote) = id.remote() {
                match self.api.delete_note(remote).await {
                    Ok(()) => {
                        self.store.remove_note(client_id, id).await;
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(error = %e, %id, "note delete failed, queueing for sync");
                    }
                }
            }
        }

        if !self.store.remove_note(client_id, id).await {
            return Err(EngineError::NotFound { entity: "note", id });
        }
        match id {
            EntityId::Local(local) => {
                self.store.purge_pending_local_note(local).await;
            }
            EntityId::Remote(_) => {
                self.store.enqueue_pending(PendingOp::DeleteNote { id }).await;
            }
        }
        Ok(())
    }
}
