//! Session store port
//!
//! The shared, persisted record every process reads. There is no
//! transaction boundary: writes are last-write-wins, and two processes that
//! both believe they hold allocation authority will race without conflict
//! detection. That limitation is accepted under the single-host assumption.

use async_trait::async_trait;
use convene_domain::{DomainError, SessionId, SessionRecord};
use thiserror::Error;

/// Errors that can occur during session store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read session record: {0}")]
    ReadFailed(String),

    #[error("Failed to write session record: {0}")]
    WriteFailed(String),

    #[error("Stored session record is invalid: {0}")]
    InvalidRecord(#[from] DomainError),
}

/// Durable keyed storage for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load one session's record. A missing session is `Ok(None)`.
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;

    /// Write a record, replacing whatever was there (last write wins).
    async fn save(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// Delete a session's record. Deleting a missing session is a no-op.
    async fn remove(&self, session_id: &SessionId) -> Result<(), StoreError>;

    /// All sessions currently present in the store.
    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError>;
}
