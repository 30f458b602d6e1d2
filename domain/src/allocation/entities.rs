//! The session assignment record.
//!
//! A [`SessionAssignment`] is the durable result of one allocation pass:
//! which rooms are bound, who sits where, and the roster the allocation was
//! computed from. It is embedded in the shared session record and read by
//! every participant process, so it is validated on every read rather than
//! trusted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::core::error::DomainError;
use crate::core::ids::{ParticipantId, RoomId, SessionId};
use crate::participant::Participant;
use crate::room::{RoomDescriptor, RoomType};

/// Name of the synthetic community room present in every assignment.
pub const MAIN_ROOM_NAME: &str = "main";

/// One bound room together with its occupants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub room: RoomDescriptor,
    pub participant_ids: Vec<ParticipantId>,
}

/// Per-participant lookup record: where a participant should go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPlacement {
    pub room_id: RoomId,
    pub room_url: String,
    pub room_name: String,
    pub room_type: RoomType,
    pub assigned_at: DateTime<Utc>,
}

impl ParticipantPlacement {
    pub fn for_room(room: &RoomDescriptor, assigned_at: DateTime<Utc>) -> Self {
        Self {
            room_id: room.id.clone(),
            room_url: room.url.clone(),
            room_name: room.name.clone(),
            room_type: room.room_type,
            assigned_at,
        }
    }
}

/// The complete result of allocating rooms for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAssignment {
    pub session_id: SessionId,
    /// Bound rooms keyed by room id, the synthetic main room included.
    pub rooms: BTreeMap<RoomId, RoomOccupancy>,
    /// Where each participant should go. Non-hosts point at their breakout
    /// room while one is active; hosts always point at the main room.
    pub participants: BTreeMap<ParticipantId, ParticipantPlacement>,
    /// The participant list the allocation was computed from. Late joiners
    /// are resolved against this by name.
    pub roster: Vec<Participant>,
    pub created_at: DateTime<Utc>,
}

impl SessionAssignment {
    pub fn new(
        session_id: SessionId,
        roster: Vec<Participant>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            rooms: BTreeMap::new(),
            participants: BTreeMap::new(),
            roster,
            created_at,
        }
    }

    /// Bind a room and record placements for its occupants.
    ///
    /// Breakout occupants become the participants-map entry for each
    /// occupant; main-room occupants only get an entry when none exists yet,
    /// so a breakout placement is never shadowed by the community room.
    pub fn insert_room(&mut self, room: RoomDescriptor, occupants: &[Participant]) {
        let placement_template = ParticipantPlacement::for_room(&room, self.created_at);
        let is_main = room.room_type == RoomType::Main;

        for occupant in occupants {
            if is_main {
                self.participants
                    .entry(occupant.id.clone())
                    .or_insert_with(|| placement_template.clone());
            } else {
                self.participants
                    .insert(occupant.id.clone(), placement_template.clone());
            }
        }

        self.rooms.insert(
            room.id.clone(),
            RoomOccupancy {
                room,
                participant_ids: occupants.iter().map(|p| p.id.clone()).collect(),
            },
        );
    }

    /// Breakout rooms only, catalog order.
    pub fn breakout_rooms(&self) -> impl Iterator<Item = &RoomOccupancy> {
        self.rooms
            .values()
            .filter(|o| o.room.room_type.is_breakout())
    }

    /// The community room entry, if recorded.
    pub fn main_room(&self) -> Option<&RoomOccupancy> {
        self.rooms
            .values()
            .find(|o| o.room.room_type == RoomType::Main)
    }

    /// Direct placement lookup by participant id.
    pub fn placement_of(&self, participant_id: &ParticipantId) -> Option<&ParticipantPlacement> {
        self.participants.get(participant_id)
    }

    /// Name-based fallback for participants who joined after allocation.
    ///
    /// Resolves to the first roster entry with the same name. Duplicate
    /// names make this first-match; that ambiguity is tracked as an open
    /// product question, not resolved here.
    pub fn placement_by_name(&self, name: &str) -> Option<&ParticipantPlacement> {
        self.roster
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| self.participants.get(&p.id))
    }

    /// Check the allocation invariants.
    ///
    /// Called on every read of a shared record: a record that another
    /// process wrote is not trusted to be well-formed.
    pub fn validate(&self) -> Result<(), DomainError> {
        let host_ids: HashSet<&ParticipantId> = self
            .roster
            .iter()
            .filter(|p| p.is_host)
            .map(|p| &p.id)
            .collect();

        let mut seen_in_breakout: HashSet<&ParticipantId> = HashSet::new();

        for occupancy in self.rooms.values() {
            let room = &occupancy.room;

            if let Some(max) = room.max_participants
                && occupancy.participant_ids.len() > max as usize
            {
                return Err(DomainError::InvalidAssignment(format!(
                    "room {} holds {} participants, capacity {}",
                    room.name,
                    occupancy.participant_ids.len(),
                    max
                )));
            }

            if !room.room_type.is_breakout() {
                continue;
            }

            for pid in &occupancy.participant_ids {
                if host_ids.contains(pid) {
                    return Err(DomainError::InvalidAssignment(format!(
                        "host {} placed in breakout room {}",
                        pid, room.name
                    )));
                }
                if !seen_in_breakout.insert(pid) {
                    return Err(DomainError::InvalidAssignment(format!(
                        "participant {} appears in more than one breakout room",
                        pid
                    )));
                }
                match self.participants.get(pid) {
                    Some(placement) if placement.room_id == room.id => {}
                    _ => {
                        return Err(DomainError::InvalidAssignment(format!(
                            "participant {} in room {} has no matching placement",
                            pid, room.name
                        )));
                    }
                }
            }
        }

        if let Some(main) = self.main_room() {
            let occupants: HashSet<&ParticipantId> = main.participant_ids.iter().collect();
            for p in &self.roster {
                if !occupants.contains(&p.id) {
                    return Err(DomainError::InvalidAssignment(format!(
                        "roster participant {} missing from the main room",
                        p.id
                    )));
                }
            }
        }

        Ok(())
    }
}
