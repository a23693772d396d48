//! Round-robin dispatch policy.
//!
//! The simplest strategy: strict rotation through the server list in
//! declaration order. Provides perfect fairness in request counts but
//! ignores both weights and current load.

use crate::traits::*;
use rand::RngCore;

/// Strict-rotation selector.
pub struct RoundRobin {
    /// Position of the next server to use.
    next: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { next: 0 }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for RoundRobin {
    fn select(&mut self, servers: &[ServerSnapshot], _rng: &mut dyn RngCore) -> usize {
        let chosen = self.next % servers.len();
        self.next = (chosen + 1) % servers.len();
        chosen
    }

    fn name(&self) -> &str {
        "round_robin"
    }
}
