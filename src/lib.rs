//! JobSync - Offline-First CRM Sync Engine
//!
//! JobSync is the client-side synchronization engine for a contractor CRM:
//! field workers read and mutate clients, notes and followups on devices
//! with intermittent connectivity, and the engine keeps the app fully
//! functional either way.
//!
//! # Overview
//!
//! This library provides:
//! - Network-first reads with transparent cache fallback
//! - Optimistic offline mutations recorded in a durable pending-action queue
//! - Ordered replay of the queue against the REST backend once connectivity
//!   returns, with server-assigned ids replacing local placeholders
//! - A background service that polls the backlog on an interval
//!
//! # Module Structure
//!
//! - **`model`** - Entity types (client, note, followup) and tagged identity
//! - **`api`** - REST client for the CRM backend, one method per endpoint
//! - **`store`** - SQLite-backed snapshot store for the cached collections
//!   and the pending queue
//! - **`offline`** - The mediator the UI calls; every operation resolves
//!   against local state regardless of connectivity
//! - **`sync`** - Reconciliation driver and background sync service
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jobsync::{EngineConfig, NewClient, OfflineEngine, SyncService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::builder()
//!     .api_url("http://crm.example.com")
//!     .token("jwt")
//!     .build()?;
//! let engine = Arc::new(OfflineEngine::new(config).await?);
//!
//! let service = SyncService::new(Arc::clone(&engine));
//! service.start();
//!
//! // Works online or offline; offline creates are queued for replay.
//! let client = engine
//!     .create_client(NewClient {
//!         name: "Ann Doyle".to_string(),
//!         phone: None,
//!         email: None,
//!         address: None,
//!         status: Default::default(),
//!     })
//!     .await;
//! println!("created {}", client.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The engine is `Send + Sync`; share it behind an `Arc`. Interior state is
//! guarded by `tokio::sync::RwLock`.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod offline;
pub mod store;
pub mod sync;

pub use api::ApiClient;
pub use config::{ConfigError, EngineConfig, EngineConfigBuilder};
pub use error::{ApiError, EngineError, InitError, StoreError};
pub use model::{
    Client, ClientPatch, ClientStatus, EntityId, Followup, FollowupPatch, NewClient, NewFollowup,
    NewNote, Note,
};
pub use offline::{EngineStatus, OfflineEngine};
pub use store::LocalStore;
pub use sync::{SyncOutcome, SyncService};
