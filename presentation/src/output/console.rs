//! Console output formatting for schedules, assignments and stats.

use colored::Colorize;

use convene_application::{SystemStats, Transition};
use convene_domain::{SessionAssignment, SessionSchedule};

/// Formats engine output for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the phase/substage time budget table.
    pub fn schedule(schedule: &SessionSchedule) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} minutes\n\n",
            "Session schedule:".cyan().bold(),
            schedule.total_minutes()
        ));

        for phase in schedule.phases() {
            output.push_str(&format!(
                "{}  {} min\n",
                format!("{:<10}", phase.kind.display_name()).yellow().bold(),
                phase.minutes
            ));
            for substage in &phase.substages {
                output.push_str(&format!(
                    "  {:<10} {:>3} min\n",
                    substage.kind.display_name(),
                    substage.minutes
                ));
            }
            output.push('\n');
        }

        output
    }

    /// Format the room listing of an assignment.
    pub fn assignment(assignment: &SessionAssignment) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Rooms for session".cyan().bold(),
            assignment.session_id.to_string().bold()
        ));

        let names = |ids: &[convene_domain::ParticipantId]| -> String {
            ids.iter()
                .map(|id| {
                    assignment
                        .roster
                        .iter()
                        .find(|p| &p.id == id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| id.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        for occupancy in assignment.breakout_rooms() {
            output.push_str(&format!(
                "\n{}  {}\n  {}\n  {}\n",
                format!("── {} ──", occupancy.room.name).yellow().bold(),
                occupancy.room.room_type,
                occupancy.room.url.dimmed(),
                names(&occupancy.participant_ids)
            ));
        }

        if let Some(main) = assignment.main_room() {
            output.push_str(&format!(
                "\n{}  everyone ({})\n  {}\n",
                format!("── {} ──", main.room.name).green().bold(),
                main.participant_ids.len(),
                main.room.url.dimmed()
            ));
        }

        output
    }

    /// Format pool statistics.
    pub fn stats(stats: &SystemStats) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} seats total\n",
            "Room pool:".cyan().bold(),
            stats.total_capacity
        ));
        for (room_type, count) in &stats.available_by_type {
            output.push_str(&format!("  {:<6} {:>2} available\n", room_type.to_string(), count));
        }
        for (room_type, count) in &stats.used_by_type {
            output.push_str(&format!(
                "  {:<6} {:>2} {}\n",
                room_type.to_string(),
                count,
                "in use".yellow()
            ));
        }

        output
    }

    /// One-line description of an orchestrator step.
    pub fn transition(transition: &Transition) -> String {
        match transition {
            Transition::Entered {
                phase,
                substage,
                minutes,
                room,
                ..
            } => {
                let rooms = match room {
                    Some(room_type) => format!("{} rooms", room_type).yellow().to_string(),
                    None => "community".green().to_string(),
                };
                format!(
                    "{} {}: {} min, {}",
                    phase.display_name().bold(),
                    substage.display_name(),
                    minutes,
                    rooms
                )
            }
            Transition::Complete => "Session complete, rooms released".green().bold().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_domain::{SessionPlan, SessionSchedule};

    #[test]
    fn test_schedule_lists_all_phases() {
        colored::control::set_override(false);
        let plan = SessionPlan::standard();
        let schedule = SessionSchedule::for_total_minutes(120, &plan);
        let text = ConsoleFormatter::schedule(&schedule);

        for name in ["Connect", "Explore", "Discover", "Closing"] {
            assert!(text.contains(name), "missing {}", name);
        }
        assert!(text.contains("120 minutes"));
    }

    #[test]
    fn test_transition_line() {
        colored::control::set_override(false);
        let line = ConsoleFormatter::transition(&Transition::Complete);
        assert!(line.contains("Session complete"));
    }
}
