//! CLI entrypoint for convene
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use convene_application::{
    PhaseOrchestrator, RegistryWatcher, RoomProvider, SessionEvent, SessionRoomRegistry,
    SessionStore,
};
use convene_domain::{
    Participant, RoomConfiguration, RoomMode, RoomType, SessionId, SessionPlan, SessionSchedule,
};
use convene_infrastructure::{
    ConveneConfig, HttpRoomProvider, JsonFileSessionStore, ProviderMode, StaticRoomProvider,
};
use convene_presentation::{Cli, ConsoleFormatter, HostConsole};

/// Join-code alphabet; ambiguous glyphs (O/0, I/1, L) are left out.
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const JOIN_CODE_LEN: usize = 4;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting convene");

    let config = ConveneConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let plan = SessionPlan::standard();
    let duration = cli.duration.unwrap_or(config.session.duration_minutes);
    let schedule = SessionSchedule::for_total_minutes(duration, &plan);

    // Schedule-only mode needs no adapters at all.
    if cli.plan {
        println!("{}", ConsoleFormatter::schedule(&schedule));
        return Ok(());
    }

    // === Dependency Injection ===
    let store: Arc<dyn SessionStore> =
        Arc::new(JsonFileSessionStore::new(store_dir(cli.store_dir.clone())?));
    let provider = build_provider(&config)?;
    let catalog = config.catalog();
    let registry = Arc::new(
        SessionRoomRegistry::new(&catalog, provider, store.clone())
            .with_shuffle(config.session.shuffle),
    );

    if cli.stats {
        let stats = registry.system_stats().await;
        println!("{}", ConsoleFormatter::stats(&stats));
        return Ok(());
    }

    let session_id = match &cli.session {
        Some(code) => SessionId::new(code.to_ascii_uppercase()),
        None => SessionId::new(generate_join_code()),
    };

    // Participant mode: observe the shared record, never allocate.
    if cli.watch {
        return watch_session(store, session_id, &config).await;
    }

    let participants = parse_participants(cli.participants.as_deref());
    let default_room_type = match &cli.room_type {
        Some(name) => name.parse::<RoomType>()?,
        None => config.session.default_room_type,
    };
    let room_configuration = RoomConfiguration::new(default_room_type)
        .with_room_switching(config.session.allow_room_switching);

    registry
        .open_session(session_id.clone(), participants.clone(), room_configuration)
        .await?;

    let mut orchestrator = PhaseOrchestrator::new(
        registry.clone(),
        session_id.clone(),
        plan.clone(),
        schedule,
        participants.clone(),
    )
    .with_room_switching(config.session.allow_room_switching);

    // An explicit room type is the host's pick for every configurable
    // dialogue; fixed dialogues keep their own type.
    if cli.room_type.is_some() {
        for phase in &plan.phases {
            if let Some(dialogue) = phase.dialogue()
                && matches!(dialogue.room_mode, RoomMode::Configurable { .. })
            {
                orchestrator.choose_room_type(phase.kind, default_room_type)?;
            }
        }
    }

    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|                convene - dialogue sessions                 |");
        println!("+============================================================+");
        println!();
        println!("Join code: {}", session_id);
        println!(
            "Participants: {}",
            participants
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    HostConsole::new(orchestrator, registry).run().await?;
    Ok(())
}

/// Read-only participant process: poll the store, print what changes.
async fn watch_session(
    store: Arc<dyn SessionStore>,
    session_id: SessionId,
    config: &ConveneConfig,
) -> Result<()> {
    let watcher = RegistryWatcher::new(store, session_id.clone(), config.poll_interval());
    let mut events = watcher.subscribe();
    let handle = watcher.spawn();

    println!("Watching session {} (ctrl-c to stop)", session_id);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(SessionEvent::Updated(record)) => {
                    println!("Session {} is {}", record.session_id, record.status);
                    if let Some(assignment) = &record.room_assignments {
                        println!("{}", ConsoleFormatter::assignment(assignment));
                    }
                }
                Ok(SessionEvent::Removed(id)) => {
                    println!("Session {} ended.", id);
                    break;
                }
                Err(_) => continue,
            },
        }
    }

    watcher.cancellation_token().cancel();
    let _ = handle.await;
    Ok(())
}

fn build_provider(config: &ConveneConfig) -> Result<Arc<dyn RoomProvider>> {
    match config.provider.mode {
        ProviderMode::Static => Ok(Arc::new(StaticRoomProvider::new(
            config.rooms.base_url.clone(),
        ))),
        ProviderMode::Http => {
            let Some(token) = &config.provider.api_token else {
                bail!("provider.mode is 'http' but no provider.api_token is configured");
            };
            let provider = HttpRoomProvider::new(
                config.provider.api_base.clone(),
                config.rooms.base_url.clone(),
                token.clone(),
            )?
            .with_room_expiry(config.room_expiry());
            Ok(Arc::new(provider))
        }
    }
}

/// Where the shared session records live.
fn store_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let Some(data) = dirs::data_dir() else {
        bail!("no data directory available; pass --store-dir");
    };
    Ok(data.join("convene").join("sessions"))
}

/// First name hosts; everyone else participates.
fn parse_participants(names: Option<&str>) -> Vec<Participant> {
    let names: Vec<&str> = names
        .unwrap_or("Host")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == 0 {
                Participant::host("host", *name)
            } else {
                Participant::new(format!("p{}", i), *name)
            }
        })
        .collect()
}

fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_participants_first_hosts() {
        let people = parse_participants(Some("Hana, Ana, Ben"));
        assert_eq!(people.len(), 3);
        assert!(people[0].is_host);
        assert_eq!(people[0].name, "Hana");
        assert!(!people[1].is_host);
        assert_eq!(people[2].name, "Ben");
    }

    #[test]
    fn test_parse_participants_default_is_lone_host() {
        let people = parse_participants(None);
        assert_eq!(people.len(), 1);
        assert!(people[0].is_host);
    }

    #[test]
    fn test_join_code_shape() {
        for _ in 0..50 {
            let code = generate_join_code();
            assert_eq!(code.len(), JOIN_CODE_LEN);
            assert!(code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)));
        }
    }
}
