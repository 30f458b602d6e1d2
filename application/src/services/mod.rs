//! Application services: the room pool, the allocator, the session
//! registry, the phase orchestrator, and the store watcher.

pub mod allocator;
pub mod orchestrator;
pub mod pool;
pub mod registry;
pub mod watcher;
