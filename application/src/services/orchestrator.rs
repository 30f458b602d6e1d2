//! The phase orchestrator.
//!
//! Drives *when* allocation happens: walks the session plan substage by
//! substage, resolves each substage's room mode, and triggers exactly one
//! registry assignment per transition into a non-community substage.
//! Community transitions never force a release; breakout rooms persist
//! until the next reassignment or the end of the session.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use convene_domain::{
    DomainError, Participant, PhaseKind, PhasePosition, RoomConfiguration, RoomType, SessionId,
    SessionPlan, SessionSchedule, SessionStatus, SubstageKind,
};

use crate::services::allocator::AllocationError;
use crate::services::registry::SessionRoomRegistry;

/// The outcome of one orchestrator step.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The session entered the substage at `position`.
    Entered {
        position: PhasePosition,
        phase: PhaseKind,
        substage: SubstageKind,
        minutes: u32,
        /// The room type allocated for this substage; `None` for community.
        room: Option<RoomType>,
    },
    /// The session is complete. Fired exactly once; later steps return it
    /// again without side effects.
    Complete,
}

/// Walks a session through its phases and substages.
pub struct PhaseOrchestrator {
    registry: Arc<SessionRoomRegistry>,
    session_id: SessionId,
    plan: SessionPlan,
    schedule: SessionSchedule,
    participants: Vec<Participant>,
    allow_room_switching: bool,
    /// Host's runtime picks for configurable dialogues, keyed by phase.
    choices: HashMap<PhaseKind, RoomType>,
    position: Option<PhasePosition>,
    complete: bool,
}

impl PhaseOrchestrator {
    pub fn new(
        registry: Arc<SessionRoomRegistry>,
        session_id: SessionId,
        plan: SessionPlan,
        schedule: SessionSchedule,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            registry,
            session_id,
            plan,
            schedule,
            participants,
            allow_room_switching: false,
            choices: HashMap::new(),
            position: None,
            complete: false,
        }
    }

    pub fn with_room_switching(mut self, allow: bool) -> Self {
        self.allow_room_switching = allow;
        self
    }

    /// Record the host's room type pick for a configurable dialogue. Takes
    /// effect at the next transition into that phase's dialogue (or an
    /// explicit jump back into it).
    pub fn choose_room_type(
        &mut self,
        phase: PhaseKind,
        room_type: RoomType,
    ) -> Result<(), DomainError> {
        if !room_type.is_breakout() {
            return Err(DomainError::UnknownRoomType(format!(
                "{} is not a breakout type",
                room_type
            )));
        }
        self.choices.insert(phase, room_type);
        Ok(())
    }

    pub fn current_position(&self) -> Option<PhasePosition> {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn schedule(&self) -> &SessionSchedule {
        &self.schedule
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Enter the first substage of the first phase.
    pub async fn start(&mut self) -> Result<Transition, AllocationError> {
        if self.complete {
            return Ok(Transition::Complete);
        }
        self.enter(PhasePosition::start()).await
    }

    /// Move to the next substage, rolling into the next phase at a phase
    /// boundary.
    pub async fn advance_substage(&mut self) -> Result<Transition, AllocationError> {
        if self.complete {
            return Ok(Transition::Complete);
        }
        let Some(current) = self.position else {
            return self.start().await;
        };
        match self.plan.next_substage(current) {
            Some(next) => self.enter(next).await,
            None => self.finish().await,
        }
    }

    /// Move to substage 0 of the next phase.
    pub async fn advance_phase(&mut self) -> Result<Transition, AllocationError> {
        if self.complete {
            return Ok(Transition::Complete);
        }
        let Some(current) = self.position else {
            return self.start().await;
        };
        match self.plan.next_phase(current) {
            Some(next) => self.enter(next).await,
            None => self.finish().await,
        }
    }

    /// Operator override: jump straight to a substage, bypassing order, and
    /// re-trigger allocation for it. A completed session stays completed.
    pub async fn jump_to(
        &mut self,
        phase: usize,
        substage: usize,
    ) -> Result<Transition, AllocationError> {
        if self.complete {
            return Ok(Transition::Complete);
        }
        let target = PhasePosition::new(phase, substage);
        if !self.plan.contains(target) {
            return Err(AllocationError::Domain(DomainError::PositionOutOfRange {
                phase,
                substage,
            }));
        }
        info!(session = %self.session_id, position = %target, "operator jump");
        self.enter(target).await
    }

    async fn enter(&mut self, position: PhasePosition) -> Result<Transition, AllocationError> {
        let Some(phase) = self.plan.phase(position.phase) else {
            return Err(AllocationError::Domain(DomainError::PositionOutOfRange {
                phase: position.phase,
                substage: position.substage,
            }));
        };
        let Some(substage) = phase.substages.get(position.substage) else {
            return Err(AllocationError::Domain(DomainError::PositionOutOfRange {
                phase: position.phase,
                substage: position.substage,
            }));
        };
        let phase_kind = phase.kind;
        let substage_kind = substage.kind;
        let resolved = self.plan.resolve_room(position, &self.choices);

        match resolved {
            Some(room_type) => {
                let config = RoomConfiguration {
                    room_type,
                    allow_room_switching: self.allow_room_switching,
                };
                let has_assignment = self
                    .registry
                    .session_record(&self.session_id)
                    .await?
                    .is_some_and(|r| r.room_assignments.is_some());

                if has_assignment {
                    self.registry.reassign(&self.session_id, room_type).await?;
                } else {
                    self.registry
                        .assign(&self.session_id, &self.participants, config)
                        .await?;
                }
                self.registry
                    .set_status(&self.session_id, SessionStatus::DialogueActive)
                    .await?;
            }
            None => {
                // Community: no allocation, no release. Rooms stay bound for
                // the next dialogue or the end of the session.
                match self
                    .registry
                    .set_status(&self.session_id, SessionStatus::MainRoomActive)
                    .await
                {
                    Ok(()) => {}
                    // Nothing persisted yet (community opening before any
                    // allocation); the record appears with the first assign.
                    Err(AllocationError::UnknownSession(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        self.position = Some(position);
        let minutes = self.schedule.substage_minutes(position).unwrap_or(0);
        debug!(
            session = %self.session_id,
            phase = %phase_kind,
            substage = %substage_kind,
            room = ?resolved,
            minutes,
            "entered substage"
        );

        Ok(Transition::Entered {
            position,
            phase: phase_kind,
            substage: substage_kind,
            minutes,
            room: resolved,
        })
    }

    /// Transition to session-complete: release the session's rooms and stop
    /// allocating. Runs exactly once.
    async fn finish(&mut self) -> Result<Transition, AllocationError> {
        self.complete = true;
        self.registry.release(&self.session_id).await;
        info!(session = %self.session_id, "session complete");
        Ok(Transition::Complete)
    }
}
