//! Room entities.

use serde::{Deserialize, Serialize};

use crate::core::ids::RoomId;
use crate::room::room_type::RoomType;

/// Lifecycle status of a room.
///
/// Rooms are never deleted, only recycled: `InUse` flips back to
/// `Available` when the owning session releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomStatus {
    Available,
    InUse,
}

/// Description of a single room known to the system.
///
/// Catalog rooms exist from process start; provider-backed rooms are created
/// lazily the first time a session needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    pub id: RoomId,
    pub name: String,
    pub url: String,
    pub room_type: RoomType,
    /// `None` for the main room (unbounded).
    pub max_participants: Option<u32>,
    pub status: RoomStatus,
}

impl RoomDescriptor {
    /// Create an available room of the given type, deriving the capacity
    /// from the type's capacity table.
    pub fn new(name: impl Into<String>, url: impl Into<String>, room_type: RoomType) -> Self {
        let name = name.into();
        Self {
            id: RoomId::new(name.clone()),
            name,
            url: url.into(),
            room_type,
            max_participants: room_type.capacity().map(|c| c as u32),
            status: RoomStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_is_available() {
        let room = RoomDescriptor::new("triad-2", "https://rooms.example/triad-2", RoomType::Triad);
        assert!(room.is_available());
        assert_eq!(room.id.as_str(), "triad-2");
        assert_eq!(room.max_participants, Some(3));
    }

    #[test]
    fn test_main_room_unbounded() {
        let room = RoomDescriptor::new("main", "https://rooms.example/main", RoomType::Main);
        assert_eq!(room.max_participants, None);
    }
}
