//! Room allocation.
//!
//! The allocator turns a participant list and a desired room type into a
//! bound [`SessionAssignment`]: partition the non-hosts, pick that many
//! available rooms, create-or-fetch each one through the provider, then
//! commit the bindings to the pool. Nothing is marked used until every
//! provider call has succeeded, so a failed allocation leaves the pool
//! exactly as it found it.

use rand::seq::SliceRandom;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use convene_domain::{
    non_hosts, partition, rooms_needed, DomainError, Participant, RoomConfiguration,
    RoomDescriptor, RoomStatus, RoomType, SessionAssignment, SessionId,
};

use crate::ports::room_provider::{ProviderError, RoomProvider};
use crate::ports::session_store::StoreError;
use crate::services::pool::RoomPoolState;

/// Errors that can occur while allocating or recording rooms
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Insufficient capacity: {needed} {room_type} room(s) needed, {available} available")]
    InsufficientCapacity {
        room_type: RoomType,
        needed: usize,
        available: usize,
    },

    /// A room the allocator believed available is bound to another session.
    /// Under the single-writer invariant this should never happen; callers
    /// treat it as a fatal configuration error.
    #[error("Room {room_id} is already bound to session {held_by}")]
    AllocationConflict { room_id: String, held_by: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("An allocation for this process is already in progress")]
    AllocationInProgress,

    #[error("Allocation produced an invalid assignment: {0}")]
    InvalidAssignment(#[source] DomainError),

    #[error("Session {0} is not known to the registry")]
    UnknownSession(SessionId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Partitions participants and binds them to rooms.
pub struct RoomAllocator {
    provider: Arc<dyn RoomProvider>,
    /// Shuffle non-hosts before partitioning so groups vary between
    /// dialogues. Off in tests for determinism.
    shuffle: bool,
}

impl RoomAllocator {
    pub fn new(provider: Arc<dyn RoomProvider>) -> Self {
        Self {
            provider,
            shuffle: true,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Allocate rooms for one session.
    ///
    /// Hosts are excluded from partitioning and only ever appear in the
    /// synthetic main room, together with every non-host participant. An
    /// empty non-host list yields zero breakout rooms and is not an error.
    ///
    /// Remote room names are prefixed with the session id so providers that
    /// create rooms on demand get per-session unique names; the pool keeps
    /// tracking rooms under their catalog id.
    pub async fn allocate(
        &self,
        pool: &mut RoomPoolState,
        session_id: &SessionId,
        participants: &[Participant],
        config: RoomConfiguration,
    ) -> Result<SessionAssignment, AllocationError> {
        let mut breakout_group_bindings: Vec<(RoomDescriptor, Vec<Participant>)> = Vec::new();

        if let Some(capacity) = config.room_type.capacity() {
            let mut eligible = non_hosts(participants);
            let needed = rooms_needed(eligible.len(), capacity);

            let available = pool.available_rooms_of_type(config.room_type);
            if available.len() < needed {
                return Err(AllocationError::InsufficientCapacity {
                    room_type: config.room_type,
                    needed,
                    available: available.len(),
                });
            }

            if self.shuffle {
                eligible.shuffle(&mut rand::thread_rng());
            }

            let groups = partition(&eligible, capacity);
            debug!(
                session = %session_id,
                room_type = %config.room_type,
                groups = groups.len(),
                "partitioned participants"
            );

            for (catalog_room, group) in available.into_iter().zip(groups) {
                let remote_name = remote_room_name(session_id, &catalog_room.name);
                let created = self
                    .provider
                    .create_room(&remote_name, config.room_type)
                    .await?;

                // Track under the catalog id; the provider only contributes
                // the join URL and remote name.
                let bound = RoomDescriptor {
                    id: catalog_room.id.clone(),
                    name: created.name,
                    url: created.url,
                    room_type: catalog_room.room_type,
                    max_participants: catalog_room.max_participants,
                    status: RoomStatus::InUse,
                };
                breakout_group_bindings.push((bound, group));
            }
        }

        let main_name = remote_room_name(session_id, "main");
        let main_room = self.provider.create_room(&main_name, RoomType::Main).await?;

        // Every provider call succeeded; commit the bindings.
        for (room, _) in &breakout_group_bindings {
            pool.mark_used(&room.id, session_id).map_err(|e| match e {
                DomainError::AllocationConflict { room_id, held_by } => {
                    AllocationError::AllocationConflict { room_id, held_by }
                }
                other => AllocationError::InvalidAssignment(other),
            })?;
        }

        let mut assignment = SessionAssignment::new(
            session_id.clone(),
            participants.to_vec(),
            chrono::Utc::now(),
        );
        for (room, group) in breakout_group_bindings {
            assignment.insert_room(room, &group);
        }
        assignment.insert_room(main_room, participants);

        assignment
            .validate()
            .map_err(AllocationError::InvalidAssignment)?;

        info!(
            session = %session_id,
            rooms = assignment.rooms.len() - 1,
            participants = participants.len(),
            "allocated breakout rooms"
        );

        Ok(assignment)
    }
}

/// Per-session unique name a room gets at the hosting provider.
fn remote_room_name(session_id: &SessionId, room_name: &str) -> String {
    format!("{}-{}", session_id.as_str().to_ascii_lowercase(), room_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{roster, DownProvider, EchoProvider};
    use convene_domain::{RoomCatalog, RoomCounts};

    fn pool() -> RoomPoolState {
        RoomPoolState::from_catalog(&RoomCatalog::new(
            RoomCounts {
                dyad: 4,
                triad: 2,
                quad: 2,
                kiva: 1,
            },
            "https://rooms.example",
        ))
    }

    fn allocator() -> RoomAllocator {
        RoomAllocator::new(Arc::new(EchoProvider)).with_shuffle(false)
    }

    #[tokio::test]
    async fn test_one_host_six_participants_in_dyads() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let participants = roster(1, 6);

        let assignment = allocator()
            .allocate(
                &mut pool,
                &session,
                &participants,
                RoomConfiguration::new(RoomType::Dyad),
            )
            .await
            .unwrap();

        let breakouts: Vec<_> = assignment.breakout_rooms().collect();
        assert_eq!(breakouts.len(), 3);
        for room in &breakouts {
            assert_eq!(room.participant_ids.len(), 2);
        }

        // The host is in no breakout room, but in main with all 7.
        let host_id = participants[0].id.clone();
        for room in &breakouts {
            assert!(!room.participant_ids.contains(&host_id));
        }
        let main = assignment.main_room().unwrap();
        assert_eq!(main.participant_ids.len(), 7);
        assert!(main.participant_ids.contains(&host_id));

        // The pool now holds three fewer dyads.
        assert_eq!(pool.available_rooms_of_type(RoomType::Dyad).len(), 1);
    }

    #[tokio::test]
    async fn test_zero_non_hosts_is_not_an_error() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let participants = roster(1, 0);

        let assignment = allocator()
            .allocate(
                &mut pool,
                &session,
                &participants,
                RoomConfiguration::new(RoomType::Kiva),
            )
            .await
            .unwrap();

        assert_eq!(assignment.breakout_rooms().count(), 0);
        assert!(assignment.main_room().is_some());
        assert_eq!(pool.available_rooms_of_type(RoomType::Kiva).len(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_capacity_leaves_pool_untouched() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        // 8 non-hosts need 2 kivas; only 1 configured.
        let participants = roster(1, 8);

        let err = allocator()
            .allocate(
                &mut pool,
                &session,
                &participants,
                RoomConfiguration::new(RoomType::Kiva),
            )
            .await
            .unwrap_err();

        match err {
            AllocationError::InsufficientCapacity {
                room_type,
                needed,
                available,
            } => {
                assert_eq!(room_type, RoomType::Kiva);
                assert_eq!(needed, 2);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(pool.available_rooms_of_type(RoomType::Kiva).len(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_pool_untouched() {
        let mut pool = pool();
        let session = SessionId::new("AAAA");
        let participants = roster(1, 4);

        let err = RoomAllocator::new(Arc::new(DownProvider))
            .with_shuffle(false)
            .allocate(
                &mut pool,
                &session,
                &participants,
                RoomConfiguration::new(RoomType::Dyad),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AllocationError::Provider(_)));
        assert_eq!(pool.available_rooms_of_type(RoomType::Dyad).len(), 4);
    }

    #[tokio::test]
    async fn test_remote_names_are_session_scoped() {
        let mut pool = pool();
        let session = SessionId::new("WXYZ");
        let participants = roster(0, 3);

        let assignment = allocator()
            .allocate(
                &mut pool,
                &session,
                &participants,
                RoomConfiguration::new(RoomType::Triad),
            )
            .await
            .unwrap();

        let breakout = assignment.breakout_rooms().next().unwrap();
        assert_eq!(breakout.room.name, "wxyz-triad-1");
        assert_eq!(breakout.room.url, "https://rooms.example/wxyz-triad-1");
        // Pool tracking stays keyed by the catalog id.
        assert_eq!(breakout.room.id.as_str(), "triad-1");
    }
}
