//! Room provider port
//!
//! Defines the interface to the external room-hosting service. Adapters
//! live in the infrastructure layer: an HTTP adapter for real providers and
//! a static adapter that derives rooms from the catalog's base URL.

use async_trait::async_trait;
use convene_domain::{RoomDescriptor, RoomType};
use thiserror::Error;

/// Errors that can occur during room provider operations
///
/// An "already exists" response from the hosting service is NOT an error:
/// adapters are required to treat it as success and derive the room URL
/// deterministically from its name, so create is idempotent under retry.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Room provider unavailable: {reason}")]
    Unavailable { reason: String },
}

impl ProviderError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Create-or-fetch access to the room-hosting service
///
/// The returned descriptor carries the room's name and join URL. Failures
/// other than "already exists" are surfaced unmodified; no adapter retries.
#[async_trait]
pub trait RoomProvider: Send + Sync {
    /// Create the named room, or fetch it if it already exists.
    async fn create_room(
        &self,
        name: &str,
        room_type: RoomType,
    ) -> Result<RoomDescriptor, ProviderError>;
}
