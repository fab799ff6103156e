//! Cached notes, bucketed by parent client.

use crate::model::{EntityId, Note};

use super::LocalStore;

impl LocalStore {
    /// Cached notes for a client, oldest first.
    pub async fn cached_notes(&self, client_id: EntityId) -> Vec<Note> {
        let state = self.state.read().await;
        state
            .notes
            .get(&client_id.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a client's note bucket, after a server read. Notes created
    /// offline that have not reconciled are kept.
    pub async fn put_notes(&self, client_id: EntityId, notes: Vec<Note>) {
        {
            let mut state = self.state.write().await;
            let bucket = state.notes.entry(client_id.to_string()).or_default();
            bucket.retain(|note| note.id.is_local());
            bucket.extend(notes);
        }
        self.save().await;
    }

    /// Insert or replace a single note in its client's bucket.
    pub async fn upsert_note(&self, note: Note) {
        {
            let mut state = self.state.write().await;
            let bucket = state.notes.entry(note.client_id.to_string()).or_default();
            bucket.retain(|existing| existing.id != note.id);
            bucket.push(note);
        }
        self.save().await;
    }

    /// Remove a note. Returns whether it was present.
    pub async fn remove_note(&self, client_id: EntityId, id: EntityId) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            match state.notes.get_mut(&client_id.to_string()) {
                Some(bucket) => {
                    let before = bucket.len();
                    bucket.retain(|note| note.id != id);
                    bucket.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.save().await;
        }
        removed
    }

    /// Replace a locally created note with its server-assigned record. The
    /// parent client has already been remapped by the time a dependent
    /// create replays, so the bucket is addressed by the confirmed record's
    /// client id.
    pub async fn adopt_note(&self, local: i64, confirmed: Note) {
        let local_id = EntityId::Local(local);
        {
            let mut state = self.state.write().await;
            let bucket = state
                .notes
                .entry(confirmed.client_id.to_string())
                .or_default();
            bucket.retain(|note| note.id != local_id && note.id != confirmed.id);
            bucket.push(confirmed);
        }
        self.save().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewNote;
    use chrono::Utc;

    fn note(id: EntityId, client_id: EntityId, body: &str) -> Note {
        NewNote {
            body: body.to_string(),
            photo_url: None,
        }
        .into_local_note(id, client_id, Utc::now())
    }

    #[tokio::test]
    async fn test_buckets_are_per_client() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(&dir.path().join("cache.db")).await.unwrap();

        store
            .upsert_note(note(EntityId::Remote(1), EntityId::Remote(10), "a"))
            .await;
        store
            .upsert_note(note(EntityId::Remote(2), EntityId::Remote(20), "b"))
            .await;

        assert_eq!(store.cached_notes(EntityId::Remote(10)).await.len(), 1);
        assert_eq!(store.cached_notes(EntityId::Remote(20)).await.len(), 1);
        assert!(store.cached_notes(EntityId::Remote(30)).await.is_empty());
    }

    #[tokio::test]
    async fn test_put_notes_keeps_unreconciled_local_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(&dir.path().join("cache.db")).await.unwrap();

        store
            .upsert_note(note(EntityId::Local(5), EntityId::Remote(10), "offline"))
            .await;
        store
            .put_notes(
                EntityId::Remote(10),
                vec![note(EntityId::Remote(1), EntityId::Remote(10), "server")],
            )
            .await;

        let notes = store.cached_notes(EntityId::Remote(10)).await;
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().any(|note| note.id == EntityId::Local(5)));
    }

    #[tokio::test]
    async fn test_adopt_note_swaps_local_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(&dir.path().join("cache.db")).await.unwrap();

        store
            .upsert_note(note(EntityId::Local(5), EntityId::Remote(10), "offline"))
            .await;
        store
            .adopt_note(5, note(EntityId::Remote(77), EntityId::Remote(10), "offline"))
            .await;

        let notes = store.cached_notes(EntityId::Remote(10)).await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, EntityId::Remote(77));
    }
}
