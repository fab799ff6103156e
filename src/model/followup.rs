//! Followup Types
//!
//! Scheduled follow-up actions for a client. Lifecycle: created →
//! (optionally) completed → deleted; no other transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EntityId;

/// A scheduled follow-up for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Followup {
    pub id: EntityId,
    /// Parent client. May be a `Local` id while the parent's create action
    /// is still queued.
    pub client_id: EntityId,
    /// What to do, e.g. "send the quote".
    pub action: String,
    pub scheduled_at: DateTime<Utc>,
    pub completed: bool,
    /// Whether the UI should raise a reminder for this followup.
    pub remind: bool,
    pub created_at: DateTime<Utc>,
}

impl Followup {
    /// Whether the followup is scheduled for the given day (UTC).
    pub fn is_due_on(&self, day: chrono::NaiveDate) -> bool {
        self.scheduled_at.date_naive() == day
    }
}

/// Request body for creating a followup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFollowup {
    pub action: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub remind: bool,
}

impl NewFollowup {
    /// Build the entity an offline create returns.
    pub fn into_local_followup(
        self,
        id: EntityId,
        client_id: EntityId,
        now: DateTime<Utc>,
    ) -> Followup {
        Followup {
            id,
            client_id,
            action: self.action,
            scheduled_at: self.scheduled_at,
            completed: false,
            remind: self.remind,
            created_at: now,
        }
    }
}

/// Partial update for a followup; `None` fields are left untouched.
/// Completion is not part of the patch, it goes through the dedicated
/// complete operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowupPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remind: Option<bool>,
}

impl FollowupPatch {
    /// Merge into a cached followup.
    pub fn apply(&self, followup: &mut Followup) {
        if let Some(action) = &self.action {
            followup.action = action.clone();
        }
        if let Some(scheduled_at) = self.scheduled_at {
            followup.scheduled_at = scheduled_at;
        }
        if let Some(remind) = self.remind {
            followup.remind = remind;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_followup_starts_incomplete() {
        let now = Utc::now();
        let followup = NewFollowup {
            action: "call about the quote".to_string(),
            scheduled_at: now + chrono::Duration::days(2),
            remind: true,
        }
        .into_local_followup(EntityId::Local(4), EntityId::Remote(9), now);

        assert!(!followup.completed);
        assert!(followup.remind);
        assert_eq!(followup.client_id, EntityId::Remote(9));
    }

    #[test]
    fn test_patch_does_not_touch_completion() {
        let now = Utc::now();
        let mut followup = NewFollowup {
            action: "call".to_string(),
            scheduled_at: now,
            remind: false,
        }
        .into_local_followup(EntityId::Remote(1), EntityId::Remote(2), now);
        followup.completed = true;

        FollowupPatch {
            action: Some("call back".to_string()),
            ..Default::default()
        }
        .apply(&mut followup);

        assert_eq!(followup.action, "call back");
        assert!(followup.completed);
    }

    #[test]
    fn test_is_due_on() {
        let now = Utc::now();
        let followup = NewFollowup {
            action: "invoice".to_string(),
            scheduled_at: now,
            remind: false,
        }
        .into_local_followup(EntityId::Remote(1), EntityId::Remote(2), now);

        assert!(followup.is_due_on(now.date_naive()));
        assert!(!followup.is_due_on(now.date_naive() + chrono::Duration::days(1)));
    }
}
