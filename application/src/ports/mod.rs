//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod events;
pub mod room_provider;
pub mod session_store;
