//! Catalog-backed room provider.
//!
//! Derives every room deterministically from a base URL. No network, never
//! fails; the default when no hosting-service token is configured.

use async_trait::async_trait;
use convene_application::{ProviderError, RoomProvider};
use convene_domain::{RoomDescriptor, RoomType};

/// Room provider that answers from the room domain alone.
pub struct StaticRoomProvider {
    base_url: String,
}

impl StaticRoomProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RoomProvider for StaticRoomProvider {
    async fn create_room(
        &self,
        name: &str,
        room_type: RoomType,
    ) -> Result<RoomDescriptor, ProviderError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), name);
        Ok(RoomDescriptor::new(name, url, room_type))
    }
}
