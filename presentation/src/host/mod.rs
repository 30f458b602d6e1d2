//! Interactive host console.

pub mod console;

pub use console::HostConsole;
