//! Simulated backend server.
//!
//! Each [`Server`] is a set of passive counters: the engine mutates them on
//! dispatch and completion, and reporting reads them after the run. There
//! is no admission control — `active_connections` is unbounded, modeling an
//! infinite queue.

use loadsim_policies::ServerSnapshot;
use serde::{Deserialize, Serialize};

/// Counters for a single simulated server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Stable identifier, immutable for the run.
    pub id: String,
    /// Capacity weight, immutable for the run. Relative selection
    /// probability under weighted dispatch.
    pub weight: u32,
    /// Requests currently in flight.
    pub active_connections: u32,
    /// Requests dispatched to this server so far. Monotone.
    pub handled_requests: u64,
    /// Accumulated busy time across all dispatched requests. Monotone.
    pub total_service_time: f64,
}

impl Server {
    /// Create a server with a fixed identity and weight.
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            weight,
            active_connections: 0,
            handled_requests: 0,
            total_service_time: 0.0,
        }
    }

    /// Account for a newly dispatched request.
    pub fn assign_request(&mut self, service_time: f64) {
        self.handled_requests += 1;
        self.total_service_time += service_time;
        self.active_connections += 1;
    }

    /// Account for a completed request. Saturates at zero so a stray
    /// double-completion can never underflow the counter.
    pub fn complete_request(&mut self) {
        self.active_connections = self.active_connections.saturating_sub(1);
    }

    /// Create a read-only snapshot for dispatch policies. `index` is the
    /// server's position in the engine's declaration order.
    pub fn snapshot(&self, index: usize) -> ServerSnapshot {
        ServerSnapshot {
            index,
            id: self.id.clone(),
            weight: self.weight,
            active_connections: self.active_connections,
            handled_requests: self.handled_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_updates_counters() {
        let mut server = Server::new("s1", 5);
        server.assign_request(2.5);
        server.assign_request(1.5);
        assert_eq!(server.handled_requests, 2);
        assert_eq!(server.active_connections, 2);
        assert!((server.total_service_time - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_complete_decrements_active() {
        let mut server = Server::new("s1", 1);
        server.assign_request(1.0);
        server.complete_request();
        assert_eq!(server.active_connections, 0);
        // handled_requests and total_service_time are untouched by completion
        assert_eq!(server.handled_requests, 1);
    }

    #[test]
    fn test_complete_saturates_at_zero() {
        let mut server = Server::new("s1", 1);
        server.complete_request();
        server.complete_request();
        assert_eq!(server.active_connections, 0);
    }

    #[test]
    fn test_snapshot_mirrors_counters() {
        let mut server = Server::new("s2", 3);
        server.assign_request(0.5);
        let snap = server.snapshot(1);
        assert_eq!(snap.index, 1);
        assert_eq!(snap.id, "s2");
        assert_eq!(snap.weight, 3);
        assert_eq!(snap.active_connections, 1);
        assert_eq!(snap.handled_requests, 1);
    }
}
