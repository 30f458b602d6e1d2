//! Application layer for convene
//!
//! This crate contains the allocation services and port definitions.
//! It depends only on the domain layer.
//!
//! The [`SessionRoomRegistry`] is the allocation authority: it owns the
//! room pool, partitions participants through the [`services::allocator`],
//! persists results through the [`ports::session_store`] port, and
//! announces every mutation. The [`PhaseOrchestrator`] decides *when*
//! allocation happens as the session walks its phases; the
//! [`RegistryWatcher`] lets read-only participant processes observe the
//! shared record.

pub mod ports;
pub mod services;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types
pub use ports::{
    events::{session_events, SessionEvent, EVENT_CHANNEL_CAPACITY},
    room_provider::{ProviderError, RoomProvider},
    session_store::{SessionStore, StoreError},
};
pub use services::{
    allocator::{AllocationError, RoomAllocator},
    orchestrator::{PhaseOrchestrator, Transition},
    pool::{RoomPoolState, RoomUsage, SystemStats},
    registry::SessionRoomRegistry,
    watcher::{RegistryWatcher, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL},
};
