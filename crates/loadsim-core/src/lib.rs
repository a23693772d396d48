//! loadsim — Discrete-event simulator for load balancer dispatch policies.
//!
//! This crate provides the core simulation engine: a seeded exponential
//! arrival process, a pool of counter-only servers, a min-heap of pending
//! completion events, and a periodic load-snapshot log. Dispatch policies
//! from `loadsim-policies` are plugged in to pick a server for each arrival.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌──────────────┐
//! │ Arrival  │────▶│  Engine   │────▶│  Snapshots / │
//! │ Sampling │     │ (Events)  │     │   Report     │
//! └──────────┘     └─────┬─────┘     └──────────────┘
//!                        │
//!                ┌───────┴───────┐
//!                │    Policy     │
//!                │  (Dispatch)   │
//!                └───────┬───────┘
//!                        │
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!    ┌──────────┐  ┌──────────┐  ┌──────────┐
//!    │ Server 0 │  │ Server 1 │  │ Server N │
//!    │ counters │  │ counters │  │ counters │
//!    └──────────┘  └──────────┘  └──────────┘
//! ```

pub mod config;
pub mod engine;
pub mod event;
pub mod fixed_step;
pub mod report;
pub mod server;
pub mod snapshot;

// Re-export key types for convenience.
pub use config::SimConfig;
pub use engine::SimulationEngine;
pub use event::CompletionEvent;
pub use fixed_step::FixedStepSimulation;
pub use report::{RunReport, ServerSummary};
pub use server::Server;
pub use snapshot::LoadSnapshot;

/// Everything a collaborator needs after a run: the summary plus the raw
/// snapshot series and the column order for tabular export.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub server_ids: Vec<String>,
    pub load_over_time: Vec<LoadSnapshot>,
}

/// Run a complete simulation with the given config and policy.
pub fn run_simulation(
    config: &SimConfig,
    policy: Box<dyn loadsim_policies::DispatchPolicy>,
) -> RunOutcome {
    let mut engine = SimulationEngine::new(config, policy);
    let final_time = engine.run(
        config.simulation.num_requests,
        config.simulation.model_service_time,
    );
    let report = RunReport::from_engine(&engine, final_time);
    let server_ids = engine.servers.iter().map(|s| s.id.clone()).collect();
    RunOutcome {
        report,
        server_ids,
        load_over_time: engine.into_load_over_time(),
    }
}

/// Run the same config under multiple policies and collect the reports.
pub fn compare_policies(config: &SimConfig, policy_names: &[&str]) -> Vec<RunReport> {
    policy_names
        .iter()
        .filter_map(|name| {
            let policy = loadsim_policies::policy_by_name(name)?;
            Some(run_simulation(config, policy).report)
        })
        .collect()
}
