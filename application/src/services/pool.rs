//! Per-process room usage tracking.
//!
//! [`RoomPoolState`] holds the live status of every catalog room. It is an
//! explicit value owned by the registry instance that performs allocation,
//! never module-level state, and it is strictly per-process: a participant
//! process that never allocates simply has an idle pool. Cross-process
//! truth lives in the session store, and this split is a known design
//! tension of the distributed model.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use convene_domain::{
    DomainError, RoomCatalog, RoomDescriptor, RoomId, RoomStatus, RoomType, SessionId,
};

/// Usage ledger entry, one per room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomUsage {
    pub room_id: RoomId,
    pub session_id: Option<SessionId>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub status: RoomStatus,
}

impl RoomUsage {
    fn available(room_id: RoomId) -> Self {
        Self {
            room_id,
            session_id: None,
            assigned_at: None,
            status: RoomStatus::Available,
        }
    }
}

/// Capacity snapshot across the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStats {
    pub total_capacity: usize,
    pub available_by_type: BTreeMap<RoomType, usize>,
    pub used_by_type: BTreeMap<RoomType, usize>,
}

/// The live status of every room this process knows about.
pub struct RoomPoolState {
    /// Descriptors in catalog order; order matters for binding.
    rooms: Vec<RoomDescriptor>,
    usage: HashMap<RoomId, RoomUsage>,
}

impl RoomPoolState {
    /// Seed the pool from the catalog. Every room starts available.
    pub fn from_catalog(catalog: &RoomCatalog) -> Self {
        let rooms: Vec<RoomDescriptor> = catalog.all_rooms().cloned().collect();
        let usage = rooms
            .iter()
            .map(|r| (r.id.clone(), RoomUsage::available(r.id.clone())))
            .collect();
        Self { rooms, usage }
    }

    /// Rooms of `room_type` not currently bound to any session, in catalog
    /// order.
    pub fn available_rooms_of_type(&self, room_type: RoomType) -> Vec<RoomDescriptor> {
        self.rooms
            .iter()
            .filter(|r| r.room_type == room_type)
            .filter(|r| {
                self.usage
                    .get(&r.id)
                    .is_none_or(|u| u.status == RoomStatus::Available)
            })
            .cloned()
            .collect()
    }

    /// Bind a room to a session.
    ///
    /// Re-binding a room to the session that already holds it is a no-op;
    /// binding a room held by a different session is an
    /// [`DomainError::AllocationConflict`], which under the single-writer
    /// invariant should never happen and is treated as fatal by callers.
    pub fn mark_used(
        &mut self,
        room_id: &RoomId,
        session_id: &SessionId,
    ) -> Result<(), DomainError> {
        let Some(usage) = self.usage.get_mut(room_id) else {
            // Rooms outside the catalog (provider-created mains) are not
            // tracked here.
            return Ok(());
        };

        if usage.status == RoomStatus::InUse {
            match &usage.session_id {
                Some(holder) if holder == session_id => return Ok(()),
                Some(holder) => {
                    return Err(DomainError::AllocationConflict {
                        room_id: room_id.to_string(),
                        held_by: holder.to_string(),
                    });
                }
                None => {}
            }
        }

        usage.status = RoomStatus::InUse;
        usage.session_id = Some(session_id.clone());
        usage.assigned_at = Some(Utc::now());
        if let Some(room) = self.rooms.iter_mut().find(|r| &r.id == room_id) {
            room.status = RoomStatus::InUse;
        }
        Ok(())
    }

    /// Return a room to the pool. Releasing an available or unknown room is
    /// a no-op, keeping teardown safe to run redundantly.
    pub fn release(&mut self, room_id: &RoomId) {
        if let Some(usage) = self.usage.get_mut(room_id) {
            usage.status = RoomStatus::Available;
            usage.session_id = None;
            usage.assigned_at = None;
        }
        if let Some(room) = self.rooms.iter_mut().find(|r| &r.id == room_id) {
            room.status = RoomStatus::Available;
        }
    }

    /// The usage entry for a room, if it is catalog-tracked.
    pub fn usage_of(&self, room_id: &RoomId) -> Option<&RoomUsage> {
        self.usage.get(room_id)
    }

    /// Capacity totals across the pool.
    pub fn stats(&self) -> SystemStats {
        let mut available_by_type = BTreeMap::new();
        let mut used_by_type = BTreeMap::new();
        let mut total_capacity = 0usize;

        for room in &self.rooms {
            if let Some(max) = room.max_participants {
                total_capacity += max as usize;
            }
            let in_use = self
                .usage
                .get(&room.id)
                .is_some_and(|u| u.status == RoomStatus::InUse);
            let bucket = if in_use {
                &mut used_by_type
            } else {
                &mut available_by_type
            };
            *bucket.entry(room.room_type).or_insert(0) += 1;
        }

        SystemStats {
            total_capacity,
            available_by_type,
            used_by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_domain::RoomCounts;

    fn pool() -> RoomPoolState {
        let catalog = RoomCatalog::new(
            RoomCounts {
                dyad: 3,
                triad: 2,
                quad: 1,
                kiva: 1,
            },
            "https://rooms.example",
        );
        RoomPoolState::from_catalog(&catalog)
    }

    #[test]
    fn test_fresh_pool_all_available() {
        let pool = pool();
        assert_eq!(pool.available_rooms_of_type(RoomType::Dyad).len(), 3);
        assert_eq!(pool.available_rooms_of_type(RoomType::Kiva).len(), 1);
    }

    #[test]
    fn test_mark_used_removes_from_available() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let room = pool.available_rooms_of_type(RoomType::Dyad)[0].clone();

        pool.mark_used(&room.id, &session).unwrap();
        assert_eq!(pool.available_rooms_of_type(RoomType::Dyad).len(), 2);

        let usage = pool.usage_of(&room.id).unwrap();
        assert_eq!(usage.status, RoomStatus::InUse);
        assert_eq!(usage.session_id.as_ref(), Some(&session));
        assert!(usage.assigned_at.is_some());
    }

    #[test]
    fn test_mark_used_same_session_is_noop() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let room = pool.available_rooms_of_type(RoomType::Triad)[0].clone();

        pool.mark_used(&room.id, &session).unwrap();
        let first_at = pool.usage_of(&room.id).unwrap().assigned_at;
        pool.mark_used(&room.id, &session).unwrap();
        assert_eq!(pool.usage_of(&room.id).unwrap().assigned_at, first_at);
    }

    #[test]
    fn test_mark_used_other_session_conflicts() {
        let mut pool = pool();
        let room = pool.available_rooms_of_type(RoomType::Quad)[0].clone();

        pool.mark_used(&room.id, &SessionId::new("AAAA")).unwrap();
        let err = pool
            .mark_used(&room.id, &SessionId::new("BBBB"))
            .unwrap_err();
        assert!(matches!(err, DomainError::AllocationConflict { .. }));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let room = pool.available_rooms_of_type(RoomType::Dyad)[0].clone();

        pool.mark_used(&room.id, &session).unwrap();
        pool.release(&room.id);
        let after_once = pool.available_rooms_of_type(RoomType::Dyad).len();
        pool.release(&room.id);
        assert_eq!(pool.available_rooms_of_type(RoomType::Dyad).len(), after_once);
        assert_eq!(after_once, 3);

        // Unknown rooms are silently ignored.
        pool.release(&RoomId::new("not-a-room"));
    }

    #[test]
    fn test_stats() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let room = pool.available_rooms_of_type(RoomType::Dyad)[0].clone();
        pool.mark_used(&room.id, &session).unwrap();

        let stats = pool.stats();
        // 3*2 + 2*3 + 4 + 6
        assert_eq!(stats.total_capacity, 22);
        assert_eq!(stats.available_by_type[&RoomType::Dyad], 2);
        assert_eq!(stats.used_by_type[&RoomType::Dyad], 1);
        assert!(!stats.used_by_type.contains_key(&RoomType::Kiva));
    }
}
