//! Built-in dispatch policies for loadsim.
//!
//! This crate provides the [`DispatchPolicy`] trait and the built-in
//! implementations used by the simulation engine:
//!
//! | Policy | Strategy | Best for |
//! |--------|----------|----------|
//! | [`WeightedRandom`] | Probability proportional to weight | Heterogeneous capacity |
//! | [`RoundRobin`] | Strict rotation | Uniform capacity |

pub mod round_robin;
pub mod traits;
pub mod weighted;

pub use round_robin::RoundRobin;
pub use traits::*;
pub use weighted::WeightedRandom;

/// Create a dispatch policy by name.
pub fn policy_by_name(name: &str) -> Option<Box<dyn DispatchPolicy>> {
    match name {
        "weighted_random" => Some(Box::new(WeightedRandom::new())),
        "round_robin" => Some(Box::new(RoundRobin::new())),
        _ => None,
    }
}

/// List all available built-in policy names.
pub fn available_policies() -> Vec<&'static str> {
    vec!["weighted_random", "round_robin"]
}
