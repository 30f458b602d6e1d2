//! Domain error types

use crate::room::RoomType;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(
        "Insufficient capacity: {needed} {room_type} room(s) needed, {available} available"
    )]
    InsufficientCapacity {
        room_type: RoomType,
        needed: usize,
        available: usize,
    },

    #[error("Room {room_id} is already bound to session {held_by}")]
    AllocationConflict { room_id: String, held_by: String },

    #[error("Unknown room type: {0}")]
    UnknownRoomType(String),

    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    #[error("Session plan has no phases")]
    EmptySessionPlan,

    #[error("Position out of range: phase {phase}, substage {substage}")]
    PositionOutOfRange { phase: usize, substage: usize },
}

impl DomainError {
    /// Check whether this error is a capacity shortfall.
    ///
    /// Callers use this to distinguish "ask the host to pick a smaller
    /// room type" from genuinely fatal conditions.
    pub fn is_insufficient_capacity(&self) -> bool {
        matches!(self, DomainError::InsufficientCapacity { .. })
    }
}
