//! Dispatch policy trait definitions.
//!
//! All dispatch policies implement the [`DispatchPolicy`] trait, which
//! receives read-only server snapshots and the engine's random stream to
//! pick a server for each arrival.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of a server's state, provided to dispatch policies.
///
/// This is the policies crate's view of a server — it carries only the
/// information needed for a selection decision, not the full simulation
/// state. The engine rebuilds the snapshots before every selection call, so
/// a policy can never observe stale or mutated state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSnapshot {
    /// Position of the server in the engine's declaration order.
    pub index: usize,
    /// Stable server identifier.
    pub id: String,
    /// Configured capacity weight.
    pub weight: u32,
    /// Requests currently in flight on this server.
    pub active_connections: u32,
    /// Requests dispatched to this server so far.
    pub handled_requests: u64,
}

/// The core dispatch policy trait.
///
/// Implement this trait to create custom selection strategies. The engine
/// calls [`select`](DispatchPolicy::select) once per arrival with a
/// non-empty server slice; the returned value is the index of the chosen
/// server in that slice.
///
/// Policies draw randomness only from the `rng` handed in by the engine, so
/// a seeded run consumes a single deterministic stream.
pub trait DispatchPolicy: Send + Sync {
    /// Pick a server for a new arrival. `servers` is never empty.
    fn select(&mut self, servers: &[ServerSnapshot], rng: &mut dyn RngCore) -> usize;

    /// Human-readable name for reports.
    fn name(&self) -> &str;
}
