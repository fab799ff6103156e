//! Note Types
//!
//! Free-text notes (optionally with a photo reference) attached to a client.
//! Notes are immutable after creation except for deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EntityId;

/// A note attached to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    /// Parent client. May be a `Local` id while the parent's create action
    /// is still queued.
    pub client_id: EntityId,
    pub body: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl NewNote {
    /// Build the entity an offline create returns.
    pub fn into_local_note(self, id: EntityId, client_id: EntityId, now: DateTime<Utc>) -> Note {
        Note {
            id,
            client_id,
            body: self.body,
            photo_url: self.photo_url,
            created_at: now,
        }
    }
}
