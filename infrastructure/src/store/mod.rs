//! Session store adapters.
//!
//! The JSON file store is the shared persistence layer independent
//! processes coordinate through; the in-memory store backs tests and
//! single-process runs.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileSessionStore;
pub use memory::InMemorySessionStore;
