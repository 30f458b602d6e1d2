//! Session record entities.
//!
//! [`SessionRecord`] is the single shape every process shares: the host
//! writes it, participant processes read it, and every notification carries
//! it whole. Writes are last-write-wins; there is no merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allocation::SessionAssignment;
use crate::core::error::DomainError;
use crate::core::ids::SessionId;
use crate::participant::Participant;
use crate::room::RoomType;

/// Where the session currently is, from a participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    /// Session exists, nobody has been placed anywhere yet.
    Waiting,
    /// Breakout rooms are bound and the lookup table is written.
    RoomsAssigned,
    /// A dialogue substage is running in breakout rooms.
    DialogueActive,
    /// A community substage is running; breakout rooms may still be bound.
    MainRoomActive,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::RoomsAssigned => "rooms-assigned",
            SessionStatus::DialogueActive => "dialogue-active",
            SessionStatus::MainRoomActive => "main-room-active",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host-chosen room settings for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfiguration {
    pub room_type: RoomType,
    /// Whether participants may move between breakout rooms on their own.
    pub allow_room_switching: bool,
}

impl Default for RoomConfiguration {
    fn default() -> Self {
        Self {
            room_type: RoomType::Dyad,
            allow_room_switching: false,
        }
    }
}

impl RoomConfiguration {
    pub fn new(room_type: RoomType) -> Self {
        Self {
            room_type,
            ..Default::default()
        }
    }

    pub fn with_room_switching(mut self, allow: bool) -> Self {
        self.allow_room_switching = allow;
        self
    }
}

/// The durable, shared record of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    /// Everyone known to the session, late joiners included. Grows over the
    /// session's lifetime; the assignment keeps its own frozen roster.
    pub participants: Vec<Participant>,
    pub status: SessionStatus,
    pub room_configuration: RoomConfiguration,
    pub room_assignments: Option<SessionAssignment>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(
        session_id: SessionId,
        participants: Vec<Participant>,
        room_configuration: RoomConfiguration,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            participants,
            status: SessionStatus::Waiting,
            room_configuration,
            room_assignments: None,
            updated_at,
        }
    }

    /// Validate the record shape. Reads of the shared store go through this
    /// so a malformed write from another process surfaces immediately.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(assignment) = &self.room_assignments {
            if assignment.session_id != self.session_id {
                return Err(DomainError::InvalidAssignment(format!(
                    "assignment for session {} stored under session {}",
                    assignment.session_id, self.session_id
                )));
            }
            assignment.validate()?;
        }
        Ok(())
    }
}
