//! Position within a session plan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `(phase index, substage index)` into a [`SessionPlan`](crate::phase::SessionPlan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PhasePosition {
    pub phase: usize,
    pub substage: usize,
}

impl PhasePosition {
    pub fn new(phase: usize, substage: usize) -> Self {
        Self { phase, substage }
    }

    /// The opening position of a session.
    pub fn start() -> Self {
        Self::default()
    }
}

impl fmt::Display for PhasePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.phase, self.substage)
    }
}
