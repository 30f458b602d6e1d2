//! Breakout allocation: partitioning rules and the assignment record.

pub mod entities;
pub mod partition;

pub use entities::{ParticipantPlacement, RoomOccupancy, SessionAssignment, MAIN_ROOM_NAME};
pub use partition::{partition, rooms_needed};
