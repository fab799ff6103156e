//! # Offline Engine
//!
//! The entity cache mediator: the single entry point the UI layer calls for
//! reads and writes. Every operation resolves immediately against local
//! state, whether or not the network cooperates.
//!
//! ## Features
//!
//! - **Network-first reads**: when the engine believes it is online, reads
//!   hit the server and refresh the cache; any failure falls back to the
//!   cached copy with a warning, never an error.
//! - **Optimistic writes**: when the network path is unavailable, mutations
//!   apply to the cache at once and a pending action is queued for replay,
//!   so the caller always gets the post-mutation entity back.
//! - **Tagged identity**: entities created offline carry `Local` placeholder
//!   ids until the sync driver reconciles them (see [`crate::sync`]).
//!
//! ## Usage
//!
//! ```no_run
//! use jobsync::{EngineConfig, OfflineEngine};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = OfflineEngine::new(EngineConfig::default()).await?;
//! let clients = engine.clients(None).await;
//! # Ok(())
//! # }
//! ```
//!
//! Per-entity operations live in `clients.rs`, `notes.rs` and
//! `followups.rs`; the queued-action types in `queue.rs`.

pub mod clients;
pub mod followups;
pub mod notes;
pub mod queue;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::api::ApiClient;
use crate::config::EngineConfig;
use crate::error::InitError;
use crate::model::LocalIdAllocator;
use crate::store::LocalStore;

/// Offline-first mediator over the REST API and the local snapshot store.
#[derive(Debug)]
pub struct OfflineEngine {
    pub(crate) api: ApiClient,
    pub(crate) store: LocalStore,
    pub(crate) ids: LocalIdAllocator,
    /// Current connectivity belief. Starts optimistic; the first failed
    /// request falls back to the cache either way.
    online: RwLock<bool>,
    config: EngineConfig,
    pub(crate) last_sync: RwLock<Option<DateTime<Utc>>>,
}

/// Point-in-time view of the engine, for status indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatus {
    pub online: bool,
    pub pending: usize,
    pub last_sync: Option<DateTime<Utc>>,
}

impl OfflineEngine {
    /// Open the snapshot store at the configured location and build the
    /// API client.
    pub async fn new(config: EngineConfig) -> Result<Self, InitError> {
        let store = LocalStore::open(&config.store_path()).await?;
        let api = ApiClient::new(config.clone())?;
        let pending = store.pending_count().await;
        info!(pending, path = %config.store_path().display(), "offline engine ready");
        Ok(Self {
            api,
            store,
            ids: LocalIdAllocator::new(),
            online: RwLock::new(true),
            config,
            last_sync: RwLock::new(None),
        })
    }

    /// Whether the engine currently believes the network is reachable.
    pub async fn is_online(&self) -> bool {
        *self.online.read().await
    }

    /// Record a connectivity change. Flag only; reconciliation on the
    /// offline-to-online transition is driven by [`crate::sync::SyncService`].
    pub async fn set_online(&self, online: bool) {
        let mut flag = self.online.write().await;
        if *flag != online {
            info!(online, "connectivity changed");
        }
        *flag = online;
    }

    /// Number of queued actions awaiting replay.
    pub async fn pending_count(&self) -> usize {
        self.store.pending_count().await
    }

    /// Snapshot of connectivity, backlog size and last reconciliation time.
    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            online: self.is_online().await,
            pending: self.pending_count().await,
            last_sync: *self.last_sync.read().await,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Direct access to the snapshot store.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}
