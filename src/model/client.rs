//! Client Record Types
//!
//! A client is the root entity of the CRM: notes and followups hang off it
//! by id. The cached copy mirrors the server's record except that its id is
//! tagged (see [`EntityId`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EntityId;

/// Job status for a client. Exactly one status applies at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Lead,
    Quoted,
    Scheduled,
    Completed,
    Paid,
}

impl ClientStatus {
    /// Wire name, used for the `status` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Lead => "lead",
            ClientStatus::Quoted => "quoted",
            ClientStatus::Scheduled => "scheduled",
            ClientStatus::Completed => "completed",
            ClientStatus::Paid => "paid",
        }
    }
}

/// A client record as held in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: EntityId,
    /// The contractor who owns this client.
    pub owner_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    /// Monotonically non-decreasing under any local mutation.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
}

impl NewClient {
    /// Build the entity an offline create returns, stamped with local
    /// timestamps and a synthesized id.
    pub fn into_local_client(self, id: EntityId, owner_id: i64, now: DateTime<Utc>) -> Client {
        Client {
            id,
            owner_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a client; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
}

impl ClientPatch {
    /// Merge into a cached client. `updated_at` never moves backwards, even
    /// if the caller's clock does.
    pub fn apply(&self, client: &mut Client, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            client.phone = Some(phone.clone());
        }
        if let Some(email) = &self.email {
            client.email = Some(email.clone());
        }
        if let Some(address) = &self.address {
            client.address = Some(address.clone());
        }
        if let Some(status) = self.status {
            client.status = status;
        }
        client.updated_at = now.max(client.updated_at);
    }
}
