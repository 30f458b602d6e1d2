//! Core domain primitives: errors and identifier value objects.

pub mod error;
pub mod ids;
