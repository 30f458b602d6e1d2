//! Domain layer for convene
//!
//! This crate contains the core business logic, entities, and value objects
//! of the breakout-room allocation engine. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Rooms
//!
//! A session alternates between one community ("main") room and small
//! breakout rooms of fixed capacity: dyad (2), triad (3), quad (4),
//! kiva (6). The [`RoomCatalog`] is the immutable table of rooms a process
//! knows about.
//!
//! ## Phases
//!
//! Sessions run Connect → Explore → Discover → Closing, each phase cycling
//! through Catalyst, Dialogue, Summary and WE substages. Each substage
//! declares a [`RoomMode`]; the [`SessionSchedule`] turns a total session
//! duration into exact per-substage minute budgets.
//!
//! ## Assignment
//!
//! A [`SessionAssignment`] records which rooms a session bound and who sits
//! where. It is shared between uncoordinated processes, so its invariants
//! are re-validated on every read.

pub mod allocation;
pub mod core;
pub mod participant;
pub mod phase;
pub mod room;
pub mod schedule;
pub mod session;

// Re-export commonly used types
pub use allocation::{
    partition, rooms_needed, ParticipantPlacement, RoomOccupancy, SessionAssignment,
    MAIN_ROOM_NAME,
};
pub use crate::core::{
    error::DomainError,
    ids::{ParticipantId, RoomId, SessionId},
};
pub use participant::{hosts, non_hosts, Participant};
pub use phase::{Phase, PhaseKind, PhasePosition, RoomMode, SessionPlan, Substage, SubstageKind};
pub use room::{RoomCatalog, RoomCounts, RoomDescriptor, RoomStatus, RoomType};
pub use schedule::{PhaseBudget, SessionSchedule, SubstageBudget};
pub use session::{RoomConfiguration, SessionRecord, SessionStatus};
