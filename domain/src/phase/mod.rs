//! Session phases and substages.
//!
//! A session moves through four ordered phases (Connect, Explore, Discover,
//! Closing), each subdivided into the same four substages (Catalyst,
//! Dialogue, Summary, WE). Substages alternate between the shared community
//! view and small-group breakout rooms; which one a substage wants is its
//! [`RoomMode`].

pub mod entities;
pub mod plan;
pub mod position;
pub mod room_mode;

pub use entities::{Phase, PhaseKind, Substage, SubstageKind};
pub use plan::SessionPlan;
pub use position::PhasePosition;
pub use room_mode::RoomMode;
