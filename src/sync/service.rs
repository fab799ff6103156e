//! Background sync service.
//!
//! Owns the connectivity flag transitions and a periodic task that drains
//! the backlog whenever the engine is online and something is queued. The
//! engine itself stays usable without the service; callers that prefer
//! manual control can invoke [`OfflineEngine::sync_changes`] directly.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::offline::{EngineStatus, OfflineEngine};

use super::SyncOutcome;

/// Periodic reconciliation driver around a shared [`OfflineEngine`].
#[derive(Debug)]
pub struct SyncService {
    engine: Arc<OfflineEngine>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SyncService {
    pub fn new(engine: Arc<OfflineEngine>) -> Self {
        Self {
            engine,
            handle: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &Arc<OfflineEngine> {
        &self.engine
    }

    /// Start the background task. Starting twice is a no-op.
    pub fn start(&self) {
        let mut guard = match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_some() {
            return;
        }

        let engine = Arc::clone(&self.engine);
        let interval = engine.config().poll_interval();
        info!(interval = ?interval, "starting background sync");
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let pending = engine.pending_count().await;
                debug!(pending, "sync tick");
                if pending > 0 && engine.is_online().await {
                    engine.sync_changes().await;
                }
            }
        }));
    }

    /// Stop the background task. The backlog stays queued.
    pub fn stop(&self) {
        let mut guard = match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = guard.take() {
            handle.abort();
            info!("background sync stopped");
        }
    }

    /// Record a connectivity change; an offline-to-online transition
    /// triggers an immediate reconciliation pass.
    pub async fn set_online(&self, online: bool) {
        let was_online = self.engine.is_online().await;
        self.engine.set_online(online).await;
        if online && !was_online {
            info!("connectivity restored, reconciling now");
            self.engine.sync_changes().await;
        }
    }

    /// Run a reconciliation pass immediately, outside the schedule.
    pub async fn sync_now(&self) -> SyncOutcome {
        self.engine.sync_changes().await
    }

    pub async fn status(&self) -> EngineStatus {
        self.engine.status().await
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.handle.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
