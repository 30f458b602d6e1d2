//! Room type definitions and the capacity table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::DomainError;

/// The kind of room a group meets in.
///
/// Breakout types carry a fixed capacity; `Main` is the whole-group
/// community room and is treated as unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomType {
    /// Community room holding every participant
    Main,
    /// Two-person breakout
    Dyad,
    /// Three-person breakout
    Triad,
    /// Four-person breakout
    Quad,
    /// Six-person circle
    Kiva,
}

impl RoomType {
    /// Maximum occupants for this room type. `None` means unbounded (main).
    pub fn capacity(&self) -> Option<usize> {
        match self {
            RoomType::Main => None,
            RoomType::Dyad => Some(2),
            RoomType::Triad => Some(3),
            RoomType::Quad => Some(4),
            RoomType::Kiva => Some(6),
        }
    }

    /// Whether this is a breakout type (anything except the main room).
    pub fn is_breakout(&self) -> bool {
        !matches!(self, RoomType::Main)
    }

    /// The breakout types in ascending capacity order.
    pub fn breakout_types() -> [RoomType; 4] {
        [RoomType::Dyad, RoomType::Triad, RoomType::Quad, RoomType::Kiva]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Main => "main",
            RoomType::Dyad => "dyad",
            RoomType::Triad => "triad",
            RoomType::Quad => "quad",
            RoomType::Kiva => "kiva",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "community" => Ok(RoomType::Main),
            "dyad" => Ok(RoomType::Dyad),
            "triad" => Ok(RoomType::Triad),
            "quad" => Ok(RoomType::Quad),
            "kiva" => Ok(RoomType::Kiva),
            other => Err(DomainError::UnknownRoomType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_table() {
        assert_eq!(RoomType::Dyad.capacity(), Some(2));
        assert_eq!(RoomType::Triad.capacity(), Some(3));
        assert_eq!(RoomType::Quad.capacity(), Some(4));
        assert_eq!(RoomType::Kiva.capacity(), Some(6));
        assert_eq!(RoomType::Main.capacity(), None);
    }

    #[test]
    fn test_breakout_classification() {
        for ty in RoomType::breakout_types() {
            assert!(ty.is_breakout());
            assert!(ty.capacity().is_some());
        }
        assert!(!RoomType::Main.is_breakout());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dyad".parse::<RoomType>().unwrap(), RoomType::Dyad);
        assert_eq!("KIVA".parse::<RoomType>().unwrap(), RoomType::Kiva);
        assert_eq!("community".parse::<RoomType>().unwrap(), RoomType::Main);
        assert!("octet".parse::<RoomType>().is_err());
        assert_eq!(RoomType::Quad.to_string(), "quad");
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&RoomType::Kiva).unwrap();
        assert_eq!(json, "\"kiva\"");
        let back: RoomType = serde_json::from_str("\"triad\"").unwrap();
        assert_eq!(back, RoomType::Triad);
    }
}
