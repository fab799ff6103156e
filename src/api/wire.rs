//! Wire representations of server payloads.
//!
//! The server speaks plain integer ids; conversion into the domain types
//! tags them as `Remote`. Only `Remote` ids ever travel back to the server.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{Client, ClientStatus, EntityId, Followup, Note};

#[derive(Debug, Deserialize)]
pub(crate) struct ClientRecord {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientRecord> for Client {
    fn from(record: ClientRecord) -> Self {
        Client {
            id: EntityId::Remote(record.id),
            owner_id: record.owner_id,
            name: record.name,
            phone: record.phone,
            email: record.email,
            address: record.address,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteRecord {
    pub id: i64,
    pub client_id: i64,
    pub body: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note {
            id: EntityId::Remote(record.id),
            client_id: EntityId::Remote(record.client_id),
            body: record.body,
            photo_url: record.photo_url,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowupRecord {
    pub id: i64,
    pub client_id: i64,
    pub action: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub remind: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FollowupRecord> for Followup {
    fn from(record: FollowupRecord) -> Self {
        Followup {
            id: EntityId::Remote(record.id),
            client_id: EntityId::Remote(record.client_id),
            action: record.action,
            scheduled_at: record.scheduled_at,
            completed: record.completed,
            remind: record.remind,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_record_decodes_and_tags_id() {
        let json = r#"{
            "id": 7,
            "owner_id": 1,
            "name": "Ann",
            "status": "quoted",
            "created_at": "2026-01-10T08:00:00Z",
            "updated_at": "2026-01-11T09:30:00Z"
        }"#;
        let record: ClientRecord = serde_json::from_str(json).unwrap();
        let client = Client::from(record);
        assert_eq!(client.id, EntityId::Remote(7));
        assert_eq!(client.status, ClientStatus::Quoted);
        assert_eq!(client.phone, None);
    }

    #[test]
    fn test_followup_record_defaults_flags() {
        let json = r#"{
            "id": 3,
            "client_id": 7,
            "action": "send quote",
            "scheduled_at": "2026-02-01T12:00:00Z",
            "created_at": "2026-01-10T08:00:00Z"
        }"#;
        let record: FollowupRecord = serde_json::from_str(json).unwrap();
        let followup = Followup::from(record);
        assert!(!followup.completed);
        assert!(!followup.remind);
        assert_eq!(followup.client_id, EntityId::Remote(7));
    }
}
