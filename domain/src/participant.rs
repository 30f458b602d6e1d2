//! Participants in a dialogue session.

use serde::{Deserialize, Serialize};

use crate::core::ids::ParticipantId;

/// One person in a session.
///
/// Hosts hold allocation authority and are excluded from breakout
/// partitioning; they only ever sit in the main room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub is_host: bool,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_host: false,
        }
    }

    pub fn host(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_host: true,
        }
    }
}

/// Participants eligible for breakout partitioning (everyone but hosts).
pub fn non_hosts(participants: &[Participant]) -> Vec<Participant> {
    participants.iter().filter(|p| !p.is_host).cloned().collect()
}

/// The hosts of a session. Usually one; the single-host assumption is not
/// enforced here.
pub fn hosts(participants: &[Participant]) -> Vec<&Participant> {
    participants.iter().filter(|p| p.is_host).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_split() {
        let roster = vec![
            Participant::host("h", "Hana"),
            Participant::new("a", "Ana"),
            Participant::new("b", "Ben"),
        ];
        assert_eq!(non_hosts(&roster).len(), 2);
        assert_eq!(hosts(&roster).len(), 1);
        assert_eq!(hosts(&roster)[0].name, "Hana");
    }
}
