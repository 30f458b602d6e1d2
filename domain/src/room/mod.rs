//! Rooms: types, descriptors and the static catalog.
//!
//! A session alternates between one large community ("main") room and a set
//! of small breakout rooms. Breakout rooms come in four fixed sizes:
//!
//! | Type  | Capacity |
//! |-------|----------|
//! | dyad  | 2        |
//! | triad | 3        |
//! | quad  | 4        |
//! | kiva  | 6        |
//!
//! The main room is effectively unbounded and is never allocated from the
//! catalog; it is synthesized per session.

pub mod catalog;
pub mod entities;
pub mod room_type;

pub use catalog::{RoomCatalog, RoomCounts};
pub use entities::{RoomDescriptor, RoomStatus};
pub use room_type::RoomType;
