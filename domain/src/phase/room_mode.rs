//! Room arrangement a substage asks for.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::room::RoomType;

/// How a substage wants participants arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RoomMode {
    /// Everyone together in the main room; no allocation happens.
    Community,
    /// Always this breakout type.
    Fixed { room_type: RoomType },
    /// The host picks at runtime; `default` is the suggestion shown.
    Configurable { default: RoomType },
    /// Reuse whatever room type this phase's Dialogue substage resolved to.
    /// A community dialogue makes the inheriting substage community too.
    InheritFromDialogue,
}

impl RoomMode {
    pub fn is_community(&self) -> bool {
        matches!(self, RoomMode::Community)
    }
}

impl fmt::Display for RoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomMode::Community => write!(f, "community"),
            RoomMode::Fixed { room_type } => write!(f, "{}", room_type),
            RoomMode::Configurable { default } => write!(f, "configurable (default {})", default),
            RoomMode::InheritFromDialogue => write!(f, "inherit from dialogue"),
        }
    }
}
