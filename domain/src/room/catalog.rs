//! Static room catalog.
//!
//! The catalog is built once at process start from per-type room counts and
//! never mutated. Names and URLs are derived deterministically (`dyad-1`,
//! `dyad-2`, ...) so that every process derives the same table from the
//! same configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::room::entities::RoomDescriptor;
use crate::room::room_type::RoomType;

/// How many rooms of each breakout type the catalog holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomCounts {
    pub dyad: usize,
    pub triad: usize,
    pub quad: usize,
    pub kiva: usize,
}

impl Default for RoomCounts {
    fn default() -> Self {
        Self {
            dyad: 8,
            triad: 6,
            quad: 6,
            kiva: 4,
        }
    }
}

impl RoomCounts {
    pub fn count_of(&self, room_type: RoomType) -> usize {
        match room_type {
            RoomType::Main => 1,
            RoomType::Dyad => self.dyad,
            RoomType::Triad => self.triad,
            RoomType::Quad => self.quad,
            RoomType::Kiva => self.kiva,
        }
    }
}

/// Immutable table of every room the process knows about, grouped by type.
#[derive(Debug, Clone)]
pub struct RoomCatalog {
    rooms: BTreeMap<RoomType, Vec<RoomDescriptor>>,
    base_url: String,
}

impl RoomCatalog {
    /// Build the catalog from per-type counts.
    ///
    /// `base_url` is the room-hosting domain rooms hang off of; the room
    /// named `dyad-1` lives at `{base_url}/dyad-1`.
    pub fn new(counts: RoomCounts, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base = base_url.trim_end_matches('/');
        let mut rooms = BTreeMap::new();

        for room_type in RoomType::breakout_types() {
            let descriptors: Vec<RoomDescriptor> = (1..=counts.count_of(room_type))
                .map(|i| {
                    let name = format!("{}-{}", room_type.as_str(), i);
                    let url = format!("{}/{}", base, name);
                    RoomDescriptor::new(name, url, room_type)
                })
                .collect();
            rooms.insert(room_type, descriptors);
        }

        Self { rooms, base_url }
    }

    /// All rooms of the given type, in catalog order.
    pub fn rooms_of_type(&self, room_type: RoomType) -> &[RoomDescriptor] {
        self.rooms.get(&room_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Capacity of a single room of the given type.
    pub fn capacity_of(&self, room_type: RoomType) -> Option<usize> {
        room_type.capacity()
    }

    /// Every breakout room in the catalog, all types.
    pub fn all_rooms(&self) -> impl Iterator<Item = &RoomDescriptor> {
        self.rooms.values().flatten()
    }

    /// Total number of seats across every breakout room.
    pub fn total_breakout_capacity(&self) -> usize {
        self.all_rooms()
            .filter_map(|r| r.max_participants)
            .map(|c| c as usize)
            .sum()
    }

    /// Derive the deterministic URL for a room name on this catalog's domain.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::new(RoomCounts::default(), "https://rooms.convene.local")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_counts_and_order() {
        let catalog = RoomCatalog::new(
            RoomCounts {
                dyad: 3,
                triad: 2,
                quad: 1,
                kiva: 1,
            },
            "https://rooms.example",
        );

        let dyads = catalog.rooms_of_type(RoomType::Dyad);
        assert_eq!(dyads.len(), 3);
        assert_eq!(dyads[0].name, "dyad-1");
        assert_eq!(dyads[2].name, "dyad-3");
        assert_eq!(dyads[1].url, "https://rooms.example/dyad-2");

        assert_eq!(catalog.rooms_of_type(RoomType::Kiva).len(), 1);
    }

    #[test]
    fn test_total_breakout_capacity() {
        let catalog = RoomCatalog::new(
            RoomCounts {
                dyad: 2,
                triad: 1,
                quad: 1,
                kiva: 1,
            },
            "https://rooms.example",
        );
        // 2*2 + 3 + 4 + 6
        assert_eq!(catalog.total_breakout_capacity(), 17);
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let catalog = RoomCatalog::new(RoomCounts::default(), "https://rooms.example/");
        assert_eq!(catalog.url_for("kiva-1"), "https://rooms.example/kiva-1");
    }
}
