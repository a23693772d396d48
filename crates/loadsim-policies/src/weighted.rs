//! Weighted random dispatch policy.
//!
//! Selects each server with probability proportional to its configured
//! weight, independent of current load. This models capacity-aware traffic
//! shaping without feedback: a server with weight 5 receives five times the
//! share of a server with weight 1, regardless of how loaded either is.

use crate::traits::*;
use rand::{Rng, RngCore};

/// Weighted random selector.
///
/// Draws a uniform integer in `[0, total_weight)` and walks the server list
/// accumulating weights; the first server whose cumulative weight exceeds
/// the draw wins.
pub struct WeightedRandom {
    /// Set after warning once about an all-zero weight vector.
    warned_zero_weights: bool,
}

impl WeightedRandom {
    pub fn new() -> Self {
        Self {
            warned_zero_weights: false,
        }
    }
}

impl Default for WeightedRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for WeightedRandom {
    fn select(&mut self, servers: &[ServerSnapshot], rng: &mut dyn RngCore) -> usize {
        let total: u32 = servers.iter().map(|s| s.weight).sum();
        if total == 0 && !self.warned_zero_weights {
            eprintln!(
                "WARNING: all server weights are zero; weighted selection degenerates \
                 to always picking the last server"
            );
            self.warned_zero_weights = true;
        }
        // Floor at 1 so an all-zero weight vector selects deterministically
        // instead of panicking on an empty range.
        let draw = rng.gen_range(0..total.max(1));

        let mut cumulative = 0u32;
        for server in servers {
            cumulative += server.weight;
            if draw < cumulative {
                return server.index;
            }
        }
        // Unreachable when total > 0: the walk covers [0, total) exactly.
        servers[servers.len() - 1].index
    }

    fn name(&self) -> &str {
        "weighted_random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::make_servers;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn weighted_servers(weights: &[u32]) -> Vec<ServerSnapshot> {
        let mut servers = make_servers(weights.len());
        for (server, &w) in servers.iter_mut().zip(weights) {
            server.weight = w;
        }
        servers
    }

    fn selection_counts(weights: &[u32], draws: usize, seed: u64) -> Vec<u64> {
        let servers = weighted_servers(weights);
        let mut policy = WeightedRandom::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts = vec![0u64; weights.len()];
        for _ in 0..draws {
            let idx = policy.select(&servers, &mut rng);
            counts[idx] += 1;
        }
        counts
    }

    /// Pearson's chi-squared statistic against expected proportional counts.
    fn chi_squared(counts: &[u64], weights: &[u32]) -> f64 {
        let total_weight: u32 = weights.iter().sum();
        let draws: u64 = counts.iter().sum();
        counts
            .iter()
            .zip(weights)
            .map(|(&observed, &w)| {
                let expected = draws as f64 * w as f64 / total_weight as f64;
                (observed as f64 - expected).powi(2) / expected
            })
            .sum()
    }

    #[test]
    fn test_frequencies_match_weights() {
        let weights = [5, 3, 2];
        let counts = selection_counts(&weights, 10_000, 42);
        // df = 2; 13.82 is the 0.999 quantile of chi-squared(2).
        let chi2 = chi_squared(&counts, &weights);
        assert!(
            chi2 < 13.82,
            "selection frequencies {:?} deviate from weights {:?} (chi2 = {:.2})",
            counts,
            weights,
            chi2
        );
    }

    #[test]
    fn test_equal_weights_statistically_even() {
        let weights = [1, 1, 1, 1];
        let counts = selection_counts(&weights, 10_000, 7);
        let chi2 = chi_squared(&counts, &weights);
        assert!(
            chi2 < 16.27, // 0.999 quantile of chi-squared(3)
            "equal-weight selection should be uniform, got {:?} (chi2 = {:.2})",
            counts,
            chi2
        );
    }

    #[test]
    fn test_zero_weight_server_never_selected() {
        let counts = selection_counts(&[4, 0, 6], 5_000, 1);
        assert_eq!(counts[1], 0);
        assert!(counts[0] > 0 && counts[2] > 0);
    }

    #[test]
    fn test_all_zero_weights_falls_back_to_last() {
        let counts = selection_counts(&[0, 0, 0], 100, 3);
        // Total weight is floored at 1, every draw is 0, and no cumulative
        // weight ever exceeds it; the defensive fallback returns the last
        // server on every call.
        assert_eq!(counts[2], 100);
    }

    #[test]
    fn test_single_server_always_selected() {
        let counts = selection_counts(&[7], 50, 9);
        assert_eq!(counts[0], 50);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let a = selection_counts(&[5, 3, 2], 1_000, 11);
        let b = selection_counts(&[5, 3, 2], 1_000, 11);
        assert_eq!(a, b);
    }

    #[test]
    fn test_oblivious_to_active_connections() {
        // Load on a server must not change its selection probability.
        let mut loaded = weighted_servers(&[1, 1]);
        loaded[0].active_connections = 10_000;
        let mut policy = WeightedRandom::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut counts = [0u64; 2];
        for _ in 0..10_000 {
            counts[policy.select(&loaded, &mut rng)] += 1;
        }
        let chi2 = chi_squared(&counts, &[1, 1]);
        assert!(chi2 < 10.83, "chi2 = {:.2}", chi2); // 0.999 quantile, df = 1
    }
}
