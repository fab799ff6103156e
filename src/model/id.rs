//! Entity Identity
//!
//! Server-assigned ids are plain integers on the wire. Entities created while
//! the engine is offline get a locally allocated placeholder instead, and the
//! two live in separate variants so a placeholder can never be mistaken for a
//! server id or collide with one. Once the corresponding create action
//! reconciles, the sync driver rewrites `Local` ids to `Remote` ids in the
//! cache and in any queued actions that reference them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Identity of a cached entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityId {
    /// Assigned by the server.
    Remote(i64),
    /// Synthesized locally for an entity created offline.
    Local(i64),
}

impl EntityId {
    /// Whether this id was synthesized offline and has not been reconciled.
    pub fn is_local(&self) -> bool {
        matches!(self, EntityId::Local(_))
    }

    /// The server-assigned id, if this entity has one.
    pub fn remote(&self) -> Option<i64> {
        match self {
            EntityId::Remote(n) => Some(*n),
            EntityId::Local(_) => None,
        }
    }

    /// The local placeholder value, if this entity was created offline.
    pub fn local(&self) -> Option<i64> {
        match self {
            EntityId::Local(n) => Some(*n),
            EntityId::Remote(_) => None,
        }
    }
}

/// Stable textual form, also used as the snapshot map key for the
/// notes-by-client and followups-by-client collections.
impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Remote(n) => write!(f, "r:{}", n),
            EntityId::Local(n) => write!(f, "l:{}", n),
        }
    }
}

impl FromStr for EntityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, value) = s.split_once(':').ok_or_else(|| ParseIdError(s.to_string()))?;
        let n: i64 = value.parse().map_err(|_| ParseIdError(s.to_string()))?;
        match tag {
            "r" => Ok(EntityId::Remote(n)),
            "l" => Ok(EntityId::Local(n)),
            _ => Err(ParseIdError(s.to_string())),
        }
    }
}

/// Failure to parse the textual form of an [`EntityId`].
#[derive(Debug, thiserror::Error)]
#[error("invalid entity id key: {0}")]
pub struct ParseIdError(String);

/// Allocator for local placeholder ids.
///
/// Seeded from the current epoch millis so ids allocated after a process
/// restart cannot collide with ids still referenced by the pending queue.
#[derive(Debug)]
pub struct LocalIdAllocator {
    next: AtomicI64,
}

impl LocalIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Hand out the next placeholder value.
    pub fn allocate_value(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Hand out the next placeholder id.
    pub fn allocate(&self) -> EntityId {
        EntityId::Local(self.allocate_value())
    }
}

impl Default for LocalIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
