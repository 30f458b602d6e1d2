//! The session room registry.
//!
//! One registry instance is the allocation authority for its process: it
//! owns the room pool, performs allocation through the [`RoomAllocator`],
//! writes the resulting record to the shared store, and announces every
//! mutation on a broadcast channel. Participant processes hold a registry
//! too, but only ever read.
//!
//! A local in-flight flag stops this process from issuing overlapping
//! allocations to itself. It provides no cross-process mutual exclusion:
//! two processes that both believe they are host race on the store with
//! last-write-wins, an accepted limitation of the single-host assumption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use convene_domain::{
    Participant, ParticipantId, ParticipantPlacement, RoomCatalog, RoomConfiguration, RoomType,
    SessionAssignment, SessionId, SessionRecord, SessionStatus,
};

use crate::ports::events::{session_events, SessionEvent};
use crate::ports::room_provider::RoomProvider;
use crate::ports::session_store::{SessionStore, StoreError};
use crate::services::allocator::{AllocationError, RoomAllocator};
use crate::services::pool::{RoomPoolState, SystemStats};

/// Clears the in-flight flag when an allocation finishes, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Authoritative record keeper for session room assignments.
pub struct SessionRoomRegistry {
    pool: Mutex<RoomPoolState>,
    allocator: RoomAllocator,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
    assigning: AtomicBool,
}

impl SessionRoomRegistry {
    pub fn new(
        catalog: &RoomCatalog,
        provider: Arc<dyn RoomProvider>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let (events, _) = session_events();
        Self {
            pool: Mutex::new(RoomPoolState::from_catalog(catalog)),
            allocator: RoomAllocator::new(provider),
            store,
            events,
            assigning: AtomicBool::new(false),
        }
    }

    /// Turn group shuffling off, for deterministic allocation.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.allocator = self.allocator.with_shuffle(shuffle);
        self
    }

    /// Subscribe to mutation notifications. Every event carries the full
    /// updated record.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Create the shared record for a new session in the waiting state.
    pub async fn open_session(
        &self,
        session_id: SessionId,
        participants: Vec<Participant>,
        room_configuration: RoomConfiguration,
    ) -> Result<SessionRecord, AllocationError> {
        let record = SessionRecord::new(
            session_id,
            participants,
            room_configuration,
            chrono::Utc::now(),
        );
        self.store.save(&record).await?;
        self.notify(SessionEvent::Updated(record.clone()));
        info!(session = %record.session_id, "opened session");
        Ok(record)
    }

    /// Add a participant to a session's roster (the join flow).
    ///
    /// Late joiners become visible to the name-based fallback lookup
    /// through the roster written here; the frozen assignment roster is
    /// untouched until the next allocation.
    pub async fn register_participant(
        &self,
        session_id: &SessionId,
        participant: Participant,
    ) -> Result<SessionRecord, AllocationError> {
        let mut record = self
            .load_record(session_id)
            .await?
            .ok_or_else(|| AllocationError::UnknownSession(session_id.clone()))?;

        if !record.participants.iter().any(|p| p.id == participant.id) {
            record.participants.push(participant);
            record.updated_at = chrono::Utc::now();
            self.store.save(&record).await?;
            self.notify(SessionEvent::Updated(record.clone()));
        }
        Ok(record)
    }

    /// Allocate rooms for a session and persist the result.
    ///
    /// Fails without touching pool or store when capacity is insufficient
    /// or the provider is down. Rooms a previous assignment bound stay
    /// bound; changing an existing layout goes through [`Self::reassign`].
    pub async fn assign(
        &self,
        session_id: &SessionId,
        participants: &[Participant],
        config: RoomConfiguration,
    ) -> Result<SessionAssignment, AllocationError> {
        let _guard = self.begin_allocation()?;
        self.assign_inner(session_id, participants, config).await
    }

    async fn assign_inner(
        &self,
        session_id: &SessionId,
        participants: &[Participant],
        config: RoomConfiguration,
    ) -> Result<SessionAssignment, AllocationError> {
        let assignment = {
            let mut pool = self.pool.lock().await;
            self.allocator
                .allocate(&mut pool, session_id, participants, config)
                .await?
        };

        let mut record = self
            .load_record(session_id)
            .await?
            .unwrap_or_else(|| {
                SessionRecord::new(
                    session_id.clone(),
                    participants.to_vec(),
                    config,
                    chrono::Utc::now(),
                )
            });

        // Union the roster: allocation may have been computed from a list
        // that includes people the record has not seen yet.
        for participant in participants {
            if !record.participants.iter().any(|p| p.id == participant.id) {
                record.participants.push(participant.clone());
            }
        }
        record.status = SessionStatus::RoomsAssigned;
        record.room_configuration = config;
        record.room_assignments = Some(assignment.clone());
        record.updated_at = chrono::Utc::now();

        self.store.save(&record).await?;
        self.notify(SessionEvent::Updated(record));
        Ok(assignment)
    }

    /// Release every room a session recorded and delete its entry.
    ///
    /// Best-effort and idempotent: a missing session, an already-released
    /// room, or a store hiccup all leave this a silent no-op. Teardown must
    /// be safe to call redundantly from multiple code paths.
    pub async fn release(&self, session_id: &SessionId) {
        let record = match self.store.load(session_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                warn!(session = %session_id, "could not load session for release: {}", e);
                return;
            }
        };

        if let Some(assignment) = &record.room_assignments {
            let mut pool = self.pool.lock().await;
            for room_id in assignment.rooms.keys() {
                pool.release(room_id);
            }
            debug!(
                session = %session_id,
                rooms = assignment.rooms.len(),
                "released session rooms"
            );
        }

        if let Err(e) = self.store.remove(session_id).await {
            warn!(session = %session_id, "could not remove session record: {}", e);
        }
        self.notify(SessionEvent::Removed(session_id.clone()));
        info!(session = %session_id, "session released");
    }

    /// Re-allocate a session with a new room type.
    ///
    /// Strictly release followed by assign, never an in-place patch, so no
    /// reader ever observes a half-updated assignment.
    pub async fn reassign(
        &self,
        session_id: &SessionId,
        new_room_type: RoomType,
    ) -> Result<SessionAssignment, AllocationError> {
        let _guard = self.begin_allocation()?;

        let record = self
            .load_record(session_id)
            .await?
            .ok_or_else(|| AllocationError::UnknownSession(session_id.clone()))?;

        let participants = record.participants.clone();
        let config = RoomConfiguration {
            room_type: new_room_type,
            allow_room_switching: record.room_configuration.allow_room_switching,
        };

        self.release(session_id).await;
        self.assign_inner(session_id, &participants, config).await
    }

    /// Where a participant should go, or `None` while no assignment covers
    /// them ("waiting for assignment", not an error).
    ///
    /// Falls back to matching by name against the assignment-time roster so
    /// participants who joined after allocation still resolve. With
    /// duplicate names this is first-match; resolving that ambiguity needs
    /// product input, not a guess here.
    pub async fn participant_room(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
    ) -> Result<Option<ParticipantPlacement>, AllocationError> {
        let Some(record) = self.load_record(session_id).await? else {
            return Ok(None);
        };
        let Some(assignment) = &record.room_assignments else {
            return Ok(None);
        };

        if let Some(placement) = assignment.placement_of(participant_id) {
            return Ok(Some(placement.clone()));
        }

        let placement = record
            .participants
            .iter()
            .find(|p| &p.id == participant_id)
            .and_then(|p| assignment.placement_by_name(&p.name))
            .cloned();
        Ok(placement)
    }

    /// Update only the session status field.
    pub async fn set_status(
        &self,
        session_id: &SessionId,
        status: SessionStatus,
    ) -> Result<(), AllocationError> {
        let mut record = self
            .load_record(session_id)
            .await?
            .ok_or_else(|| AllocationError::UnknownSession(session_id.clone()))?;
        if record.status != status {
            record.status = status;
            record.updated_at = chrono::Utc::now();
            self.store.save(&record).await?;
            self.notify(SessionEvent::Updated(record));
        }
        Ok(())
    }

    /// The current record, validated on read.
    pub async fn session_record(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionRecord>, AllocationError> {
        Ok(self.load_record(session_id).await?)
    }

    /// Capacity snapshot of this process's pool.
    pub async fn system_stats(&self) -> SystemStats {
        self.pool.lock().await.stats()
    }

    fn begin_allocation(&self) -> Result<InFlightGuard<'_>, AllocationError> {
        if self
            .assigning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AllocationError::AllocationInProgress);
        }
        Ok(InFlightGuard(&self.assigning))
    }

    /// Load and validate; a record another process wrote is not trusted.
    async fn load_record(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionRecord>, StoreError> {
        match self.store.load(session_id).await? {
            Some(record) => {
                record.validate()?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine; events are best-effort.
        let _ = self.events.send(event);
    }
}
