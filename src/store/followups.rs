//! Cached followups, bucketed by parent client.

use std::collections::BTreeMap;

use crate::model::{EntityId, Followup};

use super::LocalStore;

impl LocalStore {
    /// All cached followups, optionally restricted to today's (UTC).
    pub async fn cached_followups(&self, today: bool) -> Vec<Followup> {
        let day = chrono::Utc::now().date_naive();
        let state = self.state.read().await;
        state
            .followups
            .values()
            .flatten()
            .filter(|followup| !today || followup.is_due_on(day))
            .cloned()
            .collect()
    }

    /// Cached followups for one client.
    pub async fn cached_client_followups(&self, client_id: EntityId) -> Vec<Followup> {
        let state = self.state.read().await;
        state
            .followups
            .get(&client_id.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Cached followup by id, whichever client it belongs to.
    pub async fn cached_followup(&self, id: EntityId) -> Option<Followup> {
        let state = self.state.read().await;
        state
            .followups
            .values()
            .flatten()
            .find(|followup| followup.id == id)
            .cloned()
    }

    /// Replace one client's followup bucket, after a server read. Followups
    /// created offline that have not reconciled are kept.
    pub async fn put_client_followups(&self, client_id: EntityId, followups: Vec<Followup>) {
        {
            let mut state = self.state.write().await;
            let bucket = state.followups.entry(client_id.to_string()).or_default();
            bucket.retain(|followup| followup.id.is_local());
            bucket.extend(followups);
        }
        self.save().await;
    }

    /// Replace the server-owned part of the followup collection, after an
    /// unfiltered server read, regrouping by parent client. Followups
    /// created offline whose create actions have not reconciled stay in
    /// their buckets.
    pub async fn put_all_followups(&self, followups: Vec<Followup>) {
        {
            let mut state = self.state.write().await;
            let mut buckets: BTreeMap<String, Vec<Followup>> = BTreeMap::new();
            for (key, bucket) in std::mem::take(&mut state.followups) {
                let kept: Vec<Followup> = bucket
                    .into_iter()
                    .filter(|followup| followup.id.is_local())
                    .collect();
                if !kept.is_empty() {
                    buckets.insert(key, kept);
                }
            }
            for followup in followups {
                buckets
                    .entry(followup.client_id.to_string())
                    .or_default()
                    .push(followup);
            }
            state.followups = buckets;
        }
        self.save().await;
    }

    /// Insert or replace several followups, after a filtered server read
    /// that must not discard followups outside the filter.
    pub async fn upsert_followups(&self, followups: Vec<Followup>) {
        {
            let mut state = self.state.write().await;
            for followup in followups {
                let bucket = state
                    .followups
                    .entry(followup.client_id.to_string())
                    .or_default();
                bucket.retain(|existing| existing.id != followup.id);
                bucket.push(followup);
            }
        }
        self.save().await;
    }

    /// Insert or replace a single followup in its client's bucket.
    pub async fn upsert_followup(&self, followup: Followup) {
        {
            let mut state = self.state.write().await;
            let bucket = state
                .followups
                .entry(followup.client_id.to_string())
                .or_default();
            bucket.retain(|existing| existing.id != followup.id);
            bucket.push(followup);
        }
        self.save().await;
    }

    /// Remove a followup. Returns whether it was present.
    pub async fn remove_followup(&self, client_id: EntityId, id: EntityId) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            match state.followups.get_mut(&client_id.to_string()) {
                Some(bucket) => {
                    let before = bucket.len();
                    bucket.retain(|followup| followup.id != id);
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

    /// Replace a locally created followup with its server-assigned record.
    pub async fn adopt_followup(&self, local: i64, confirmed: Followup) {
        let local_id = EntityId::Local(local);
        {
            let mut state = self.state.write().await;
            let bucket = state
                .followups
                .entry(confirmed.client_id.to_string())
                .or_default();
            bucket.retain(|followup| followup.id != local_id && followup.id != confirmed.id);
            bucket.push(confirmed);
        }
        self.save().await;
    }
}
