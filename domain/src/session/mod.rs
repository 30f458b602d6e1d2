//! The shared session record.

pub mod entities;

pub use entities::{RoomConfiguration, SessionRecord, SessionStatus};
