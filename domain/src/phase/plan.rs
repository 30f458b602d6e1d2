//! The session plan: ordered phases, ordered substages, room modes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::DomainError;
use crate::phase::entities::{Phase, PhaseKind, Substage, SubstageKind};
use crate::phase::position::PhasePosition;
use crate::phase::room_mode::RoomMode;
use crate::room::RoomType;

/// The full arc of a session from Connect through Closing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub phases: Vec<Phase>,
}

impl SessionPlan {
    pub fn new(phases: Vec<Phase>) -> Result<Self, DomainError> {
        if phases.is_empty() {
            return Err(DomainError::EmptySessionPlan);
        }
        Ok(Self { phases })
    }

    /// The standard four-phase arc.
    ///
    /// Dialogue rooms grow as the session deepens: Connect pairs people up,
    /// Explore and Discover let the host pick (triads and quads suggested),
    /// Closing stays in community throughout. Summaries always harvest in
    /// the rooms the dialogue happened in.
    pub fn standard() -> Self {
        let substages = |dialogue_mode: RoomMode| {
            vec![
                Substage::new(SubstageKind::Catalyst, RoomMode::Community),
                Substage::new(SubstageKind::Dialogue, dialogue_mode),
                Substage::new(SubstageKind::Summary, RoomMode::InheritFromDialogue),
                Substage::new(SubstageKind::We, RoomMode::Community),
            ]
        };

        Self {
            phases: vec![
                Phase::new(
                    PhaseKind::Connect,
                    substages(RoomMode::Fixed {
                        room_type: RoomType::Dyad,
                    }),
                ),
                Phase::new(
                    PhaseKind::Explore,
                    substages(RoomMode::Configurable {
                        default: RoomType::Triad,
                    }),
                ),
                Phase::new(
                    PhaseKind::Discover,
                    substages(RoomMode::Configurable {
                        default: RoomType::Quad,
                    }),
                ),
                Phase::new(PhaseKind::Closing, substages(RoomMode::Community)),
            ],
        }
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn substage(&self, position: PhasePosition) -> Option<&Substage> {
        self.phases
            .get(position.phase)
            .and_then(|p| p.substages.get(position.substage))
    }

    /// Whether a position addresses an existing substage.
    pub fn contains(&self, position: PhasePosition) -> bool {
        self.substage(position).is_some()
    }

    /// The position after `position`, moving substage-wise.
    ///
    /// Rolls over into the next phase at a phase boundary; `None` means the
    /// session is complete.
    pub fn next_substage(&self, position: PhasePosition) -> Option<PhasePosition> {
        let phase = self.phases.get(position.phase)?;
        if position.substage + 1 < phase.substages.len() {
            Some(PhasePosition::new(position.phase, position.substage + 1))
        } else {
            self.next_phase(position)
        }
    }

    /// Substage 0 of the phase after `position`'s; `None` past the last phase.
    pub fn next_phase(&self, position: PhasePosition) -> Option<PhasePosition> {
        if position.phase + 1 < self.phases.len() {
            Some(PhasePosition::new(position.phase + 1, 0))
        } else {
            None
        }
    }

    /// Resolve the room type a substage actually uses.
    ///
    /// `choices` holds the host's runtime picks for configurable dialogues,
    /// keyed by phase. `None` means community: no allocation.
    pub fn resolve_room(
        &self,
        position: PhasePosition,
        choices: &HashMap<PhaseKind, RoomType>,
    ) -> Option<RoomType> {
        let phase = self.phases.get(position.phase)?;
        let substage = phase.substages.get(position.substage)?;
        self.resolve_mode(phase, &substage.room_mode, choices)
    }

    fn resolve_mode(
        &self,
        phase: &Phase,
        mode: &RoomMode,
        choices: &HashMap<PhaseKind, RoomType>,
    ) -> Option<RoomType> {
        match mode {
            RoomMode::Community => None,
            RoomMode::Fixed { room_type } => Some(*room_type),
            RoomMode::Configurable { default } => {
                Some(choices.get(&phase.kind).copied().unwrap_or(*default))
            }
            RoomMode::InheritFromDialogue => {
                let dialogue = phase.dialogue()?;
                // A dialogue never inherits from itself.
                if matches!(dialogue.room_mode, RoomMode::InheritFromDialogue) {
                    return None;
                }
                self.resolve_mode(phase, &dialogue.room_mode, choices)
            }
        }
    }
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self::standard()
    }
}
