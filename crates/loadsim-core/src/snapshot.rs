//! Periodic observations of per-server load.

use crate::server::Server;
use serde::{Deserialize, Serialize};

/// The active load of every server at one simulated instant.
///
/// `loads` is ordered by server declaration order and parallel to the
/// engine's server list; the identifiers live with the servers, not the
/// snapshot, so a long run does not repeat them thousands of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSnapshot {
    /// Simulated time of the observation.
    pub time: f64,
    /// Active connection count per server, in declaration order.
    pub loads: Vec<u32>,
}

impl LoadSnapshot {
    /// Record the current active load of every server.
    pub fn capture(time: f64, servers: &[Server]) -> Self {
        Self {
            time,
            loads: servers.iter().map(|s| s.active_connections).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_declaration_order() {
        let mut servers = vec![Server::new("a", 1), Server::new("b", 1)];
        servers[1].assign_request(1.0);
        let snap = LoadSnapshot::capture(3.5, &servers);
        assert_eq!(snap.time, 3.5);
        assert_eq!(snap.loads, vec![0, 1]);
    }
}
