//! Phase and substage entities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::phase::room_mode::RoomMode;

/// The four ordered phases of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    Connect,
    Explore,
    Discover,
    Closing,
}

impl PhaseKind {
    /// All phases in session order.
    pub fn ordered() -> [PhaseKind; 4] {
        [
            PhaseKind::Connect,
            PhaseKind::Explore,
            PhaseKind::Discover,
            PhaseKind::Closing,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Connect => "connect",
            PhaseKind::Explore => "explore",
            PhaseKind::Discover => "discover",
            PhaseKind::Closing => "closing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseKind::Connect => "Connect",
            PhaseKind::Explore => "Explore",
            PhaseKind::Discover => "Discover",
            PhaseKind::Closing => "Closing",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The four ordered substages within every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubstageKind {
    /// Opening prompt, whole group
    Catalyst,
    /// Small-group conversation
    Dialogue,
    /// Groups harvest their conversation
    Summary,
    /// Whole-group weaving
    We,
}

impl SubstageKind {
    pub fn ordered() -> [SubstageKind; 4] {
        [
            SubstageKind::Catalyst,
            SubstageKind::Dialogue,
            SubstageKind::Summary,
            SubstageKind::We,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubstageKind::Catalyst => "catalyst",
            SubstageKind::Dialogue => "dialogue",
            SubstageKind::Summary => "summary",
            SubstageKind::We => "we",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SubstageKind::Catalyst => "Catalyst",
            SubstageKind::Dialogue => "Dialogue",
            SubstageKind::Summary => "Summary",
            SubstageKind::We => "WE",
        }
    }
}

impl fmt::Display for SubstageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One substage of a phase and the room arrangement it wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substage {
    pub kind: SubstageKind,
    pub room_mode: RoomMode,
}

impl Substage {
    pub fn new(kind: SubstageKind, room_mode: RoomMode) -> Self {
        Self { kind, room_mode }
    }
}

/// One phase: an ordered run of substages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub substages: Vec<Substage>,
}

impl Phase {
    pub fn new(kind: PhaseKind, substages: Vec<Substage>) -> Self {
        Self { kind, substages }
    }

    /// The Dialogue substage of this phase, if it has one.
    pub fn dialogue(&self) -> Option<&Substage> {
        self.substages
            .iter()
            .find(|s| s.kind == SubstageKind::Dialogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let order = PhaseKind::ordered();
        assert_eq!(order[0], PhaseKind::Connect);
        assert_eq!(order[3], PhaseKind::Closing);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(SubstageKind::We.display_name(), "WE");
        assert_eq!(format!("{}", PhaseKind::Discover), "Discover");
        assert_eq!(SubstageKind::Catalyst.as_str(), "catalyst");
    }

    #[test]
    fn test_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PhaseKind::Connect).unwrap(),
            "\"connect\""
        );
        assert_eq!(serde_json::to_string(&SubstageKind::We).unwrap(), "\"we\"");
    }
}
