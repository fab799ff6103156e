//! Pending-Action Queue Types
//!
//! A pending action records a mutation that could not be confirmed against
//! the network. The persisted shape is `{id, kind, payload, timestamp}` with
//! a stable kind string; [`PendingOp`] is the typed view, decoded from kind
//! plus payload at replay time so that an unrecognized kind fails that one
//! action instead of poisoning the whole queue.
//!
//! Actions are never mutated in place except for removal — and id remapping
//! after a parent create reconciles, which rewrites `Local` references to
//! the server-assigned id before the dependent action replays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::model::{ClientPatch, EntityId, FollowupPatch, NewClient, NewFollowup, NewNote};

/// A queued mutation awaiting replay, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Locally generated, never reused.
    pub id: String,
    /// Stable operation name, e.g. `create_client`.
    pub kind: String,
    /// The original mutation request, opaque until replay.
    pub payload: Value,
    /// Creation time; the queue is drained in ascending order of this.
    #[serde(rename = "timestamp")]
    pub queued_at: DateTime<Utc>,
}

impl PendingAction {
    /// Record an operation with a fresh id and the current time.
    pub fn record(op: &PendingOp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: op.kind_name().to_string(),
            payload: op.payload(),
            queued_at: Utc::now(),
        }
    }
}

/// Typed view of a pending action.
///
/// Create variants carry the placeholder id handed back to the caller at
/// enqueue time, so reconciliation knows which cached entity to rewrite once
/// the server assigns a real id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum PendingOp {
    CreateClient {
        local_id: i64,
        body: NewClient,
    },
    UpdateClient {
        id: EntityId,
        patch: ClientPatch,
    },
    DeleteClient {
        id: EntityId,
    },
    CreateNote {
        local_id: i64,
        client_id: EntityId,
        body: NewNote,
    },
    DeleteNote {
        id: EntityId,
    },
    CreateFollowup {
        local_id: i64,
        client_id: EntityId,
        body: NewFollowup,
    },
    UpdateFollowup {
        id: EntityId,
        patch: FollowupPatch,
    },
    CompleteFollowup {
        id: EntityId,
    },
    DeleteFollowup {
        id: EntityId,
    },
}

impl PendingOp {
    /// Stable wire name for this operation.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PendingOp::CreateClient { .. } => "create_client",
            PendingOp::UpdateClient { .. } => "update_client",
            PendingOp::DeleteClient { .. } => "delete_client",
            PendingOp::CreateNote { .. } => "create_note",
            PendingOp::DeleteNote { .. } => "delete_note",
            PendingOp::CreateFollowup { .. } => "create_followup",
            PendingOp::UpdateFollowup { .. } => "update_followup",
            PendingOp::CompleteFollowup { .. } => "complete_followup",
            PendingOp::DeleteFollowup { .. } => "delete_followup",
        }
    }

    /// Persisted payload for this operation, matching the shape
    /// [`Self::from_action`] decodes.
    pub fn payload(&self) -> Value {
        match self {
            PendingOp::CreateClient { local_id, body } => {
                json!({ "local_id": local_id, "body": body })
            }
            PendingOp::UpdateClient { id, patch } => json!({ "id": id, "patch": patch }),
            PendingOp::DeleteClient { id } => json!({ "id": id }),
            PendingOp::CreateNote {
                local_id,
                client_id,
                body,
            } => json!({ "local_id": local_id, "client_id": client_id, "body": body }),
            PendingOp::DeleteNote { id } => json!({ "id": id }),
            PendingOp::CreateFollowup {
                local_id,
                client_id,
                body,
            } => json!({ "local_id": local_id, "client_id": client_id, "body": body }),
            PendingOp::UpdateFollowup { id, patch } => json!({ "id": id, "patch": patch }),
            PendingOp::CompleteFollowup { id } => json!({ "id": id }),
            PendingOp::DeleteFollowup { id } => json!({ "id": id }),
        }
    }

    /// Decode a stored action. An unrecognized kind or a malformed payload
    /// is an error for this action alone.
    pub fn from_action(action: &PendingAction) -> Result<PendingOp, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "kind": action.kind,
            "payload": action.payload,
        }))
    }

    /// Rewrite references to a locally created client once its real id is
    /// known.
    pub fn remap_client(&mut self, local: i64, remote: i64) {
        match self {
            PendingOp::UpdateClient { id, .. } | PendingOp::DeleteClient { id } => {
                remap_id(id, local, remote)
            }
            PendingOp::CreateNote { client_id, .. }
            | PendingOp::CreateFollowup { client_id, .. } => remap_id(client_id, local, remote),
            _ => {}
        }
    }

    /// Rewrite references to a locally created note.
    pub fn remap_note(&mut self, local: i64, remote: i64) {
        if let PendingOp::DeleteNote { id } = self {
            remap_id(id, local, remote);
        }
    }

    /// Rewrite references to a locally created followup.
    pub fn remap_followup(&mut self, local: i64, remote: i64) {
        match self {
            PendingOp::UpdateFollowup { id, .. }
            | PendingOp::CompleteFollowup { id }
            | PendingOp::DeleteFollowup { id } => remap_id(id, local, remote),
            _ => {}
        }
    }

    /// Whether this action is the create of, or depends on, the given
    /// locally created client. Used to drop actions that became moot when a
    /// client that never reached the server was deleted offline.
    pub fn references_local_client(&self, local: i64) -> bool {
        match self {
            PendingOp::CreateClient { local_id, .. } => *local_id == local,
            PendingOp::UpdateClient { id, .. } | PendingOp::DeleteClient { id } => {
                *id == EntityId::Local(local)
            }
            PendingOp::CreateNote { client_id, .. }
            | PendingOp::CreateFollowup { client_id, .. } => *client_id == EntityId::Local(local),
            _ => false,
        }
    }

    /// As above, for a locally created note.
    pub fn references_local_note(&self, local: i64) -> bool {
        match self {
            PendingOp::CreateNote { local_id, .. } => *local_id == local,
            PendingOp::DeleteNote { id } => *id == EntityId::Local(local),
            _ => false,
        }
    }

    /// As above, for a locally created followup.
    pub fn references_local_followup(&self, local: i64) -> bool {
        match self {
            PendingOp::CreateFollowup { local_id, .. } => *local_id == local,
            PendingOp::UpdateFollowup { id, .. }
            | PendingOp::CompleteFollowup { id }
            | PendingOp::DeleteFollowup { id } => *id == EntityId::Local(local),
            _ => false,
        }
    }
}

fn remap_id(id: &mut EntityId, local: i64, remote: i64) {
    if *id == EntityId::Local(local) {
        *id = EntityId::Remote(remote);
    }
}

/// Snapshot of a queue ordered by enqueue time, oldest first. The sort is
/// stable, so actions stamped within the same instant keep insertion order.
pub fn order_by_queue_time(mut actions: Vec<PendingAction>) -> Vec<PendingAction> {
    actions.sort_by_key(|action| action.queued_at);
    actions
}
