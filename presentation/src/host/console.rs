//! REPL for the session host.
//!
//! The host process holds allocation authority; this console drives the
//! orchestrator through the session's phases and surfaces the resulting
//! room assignments.

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

use convene_application::{
    AllocationError, PhaseOrchestrator, SessionRoomRegistry, Transition,
};
use convene_domain::{ParticipantId, RoomType};

use crate::output::ConsoleFormatter;

/// Interactive console driving one session.
pub struct HostConsole {
    orchestrator: PhaseOrchestrator,
    registry: Arc<SessionRoomRegistry>,
}

impl HostConsole {
    pub fn new(orchestrator: PhaseOrchestrator, registry: Arc<SessionRoomRegistry>) -> Self {
        Self {
            orchestrator,
            registry,
        }
    }

    /// Run the console until the host quits.
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("convene").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        let started = self.orchestrator.start().await;
        self.report(started).await;

        loop {
            let readline = rl.readline("convene> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);
                    if self.handle_command(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }
        Ok(())
    }

    /// Returns true when the console should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match command {
            "next" | "n" => {
                let result = self.orchestrator.advance_substage().await;
                self.report(result).await;
            }
            "phase" | "p" => {
                let result = self.orchestrator.advance_phase().await;
                self.report(result).await;
            }
            "jump" => match (args.first(), args.get(1)) {
                (Some(phase), Some(substage)) => {
                    match (phase.parse::<usize>(), substage.parse::<usize>()) {
                        (Ok(phase), Ok(substage)) => {
                            let result = self.orchestrator.jump_to(phase, substage).await;
                            self.report(result).await;
                        }
                        _ => println!("Usage: jump <phase 0-3> <substage 0-3>"),
                    }
                }
                _ => println!("Usage: jump <phase 0-3> <substage 0-3>"),
            },
            "rooms" => match args.first() {
                Some(&type_name) => self.change_rooms(type_name).await,
                None => println!("Usage: rooms <dyad|triad|quad|kiva>"),
            },
            "who" => match args.first() {
                Some(&id) => self.lookup(id).await,
                None => println!("Usage: who <participant-id>"),
            },
            "status" | "s" => self.print_status().await,
            "stats" => {
                let stats = self.registry.system_stats().await;
                println!("{}", ConsoleFormatter::stats(&stats));
            }
            "release" => {
                self.registry.release(self.orchestrator.session_id()).await;
                println!("Rooms released.");
            }
            "help" | "?" => Self::print_help(),
            "quit" | "exit" | "q" => return true,
            other => println!("Unknown command '{}'. Try 'help'.", other),
        }
        false
    }

    async fn report(&self, result: Result<Transition, AllocationError>) {
        match result {
            Ok(transition) => {
                println!("{}", ConsoleFormatter::transition(&transition));
                if let Transition::Entered { room: Some(_), .. } = transition {
                    self.print_assignment().await;
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    async fn change_rooms(&mut self, type_name: &str) {
        let room_type: RoomType = match type_name.parse() {
            Ok(room_type) => room_type,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };

        let Some(position) = self.orchestrator.current_position() else {
            println!("Session has not started yet.");
            return;
        };
        let Some(phase) = self.orchestrator.plan().phase(position.phase) else {
            return;
        };
        let phase_kind = phase.kind;

        if let Err(e) = self.orchestrator.choose_room_type(phase_kind, room_type) {
            eprintln!("Error: {}", e);
            return;
        }

        // Re-enter the current substage so the choice takes effect now; in
        // a community substage the pick applies to the next dialogue.
        let result = self.orchestrator.jump_to(position.phase, position.substage).await;
        self.report(result).await;
    }

    async fn lookup(&self, id: &str) {
        let participant_id = ParticipantId::new(id);
        match self
            .registry
            .participant_room(self.orchestrator.session_id(), &participant_id)
            .await
        {
            Ok(Some(placement)) => println!(
                "{} -> {} ({}) {}",
                id, placement.room_name, placement.room_type, placement.room_url
            ),
            Ok(None) => println!("{} is waiting for assignment.", id),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    async fn print_status(&self) {
        match self.orchestrator.current_position() {
            Some(position) => {
                if let Some(phase) = self.orchestrator.plan().phase(position.phase) {
                    let substage = &phase.substages[position.substage];
                    let minutes = self
                        .orchestrator
                        .schedule()
                        .substage_minutes(position)
                        .unwrap_or(0);
                    println!(
                        "At {} {} ({} min) [position {}]",
                        phase.kind.display_name(),
                        substage.kind.display_name(),
                        minutes,
                        position
                    );
                }
            }
            None => println!("Session has not started yet."),
        }
        if self.orchestrator.is_complete() {
            println!("Session is complete.");
        }
        self.print_assignment().await;
    }

    async fn print_assignment(&self) {
        match self
            .registry
            .session_record(self.orchestrator.session_id())
            .await
        {
            Ok(Some(record)) => {
                if let Some(assignment) = &record.room_assignments {
                    println!("{}", ConsoleFormatter::assignment(assignment));
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!(
            "Hosting session {} ({} minutes).",
            self.orchestrator.session_id(),
            self.orchestrator.schedule().total_minutes()
        );
        println!("Type 'help' for commands.");
        println!();
    }

    fn print_help() {
        println!("Commands:");
        println!("  next (n)          advance to the next substage");
        println!("  phase (p)         advance to the next phase");
        println!("  jump <p> <s>      jump to phase p, substage s (0-based)");
        println!("  rooms <type>      switch breakout type (dyad|triad|quad|kiva)");
        println!("  who <id>          where a participant should go");
        println!("  status (s)        current position and rooms");
        println!("  stats             room pool statistics");
        println!("  release           release this session's rooms");
        println!("  quit (q)          leave the console");
    }
}
