//! Error types.
//!
//! One enum per layer. Network-shaped failures are recovered internally by
//! the offline layer and rarely reach the caller; the errors that do surface
//! are logic errors (an update or delete of something not in the cache) and
//! initialization failures.

use thiserror::Error;

use crate::model::EntityId;

/// Errors from the REST API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, or the configured timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Errors from the local snapshot store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not create data directory {path}: {source}")]
    DataDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Errors surfaced to the UI layer by engine write operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The update/delete target is absent from the local cache while the
    /// network path is unavailable. A logic error, not a transient
    /// condition: nothing is queued for retry.
    #[error("{entity} {id} not found in local cache")]
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
}

/// Errors constructing the engine.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
