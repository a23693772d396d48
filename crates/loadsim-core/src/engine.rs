//! Discrete-event simulation engine.
//!
//! The engine generates arrivals from a seeded exponential process,
//! dispatches each one through a pluggable [`DispatchPolicy`], and keeps a
//! min-heap of pending completion events. Simulated time only moves
//! forward, driven by arrivals and by draining the heap; a load snapshot is
//! recorded at every multiple of the snapshot interval the clock crosses.
//!
//! The per-arrival step order is load-bearing for determinism and for the
//! snapshot semantics:
//!
//! 1. sample the interarrival gap and advance the clock;
//! 2. drain completions due at or before the new time;
//! 3. record every snapshot boundary the clock crossed, at the boundary
//!    time itself;
//! 4. ask the policy for a server and assign the request;
//! 5. when service time is modeled, sample a duration and schedule the
//!    completion.

use crate::config::SimConfig;
use crate::event::CompletionEvent;
use crate::server::Server;
use crate::snapshot::LoadSnapshot;
use loadsim_policies::{DispatchPolicy, ServerSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BinaryHeap;

/// Uniform draws below this are clamped before the logarithm, so a draw of
/// exactly zero cannot produce an infinite sample.
const MIN_UNIFORM_DRAW: f64 = 1e-12;

/// The main simulation engine.
///
/// Owns the server pool, the random stream, the completion heap, and the
/// snapshot log for the duration of a single run. Policies see the servers
/// only through read-only snapshots rebuilt at each selection call.
pub struct SimulationEngine {
    /// Server pool in declaration order.
    pub servers: Vec<Server>,
    /// Dispatch policy consulted once per arrival.
    policy: Box<dyn DispatchPolicy>,
    /// Seeded random stream shared by arrival sampling, dispatch, and
    /// service sampling.
    rng: ChaCha8Rng,
    mean_interarrival: f64,
    mean_service: f64,
    snapshot_interval: f64,
    /// Current simulated time. Monotone across the run.
    current_time: f64,
    /// Next snapshot boundary to record.
    next_snapshot_time: f64,
    /// Pending completions, min-heap by time.
    completions: BinaryHeap<CompletionEvent>,
    /// Sequence counter for FIFO tie-breaking.
    sequence: u64,
    /// Append-only snapshot log.
    load_over_time: Vec<LoadSnapshot>,
}

impl SimulationEngine {
    /// Create an engine from a validated config and a dispatch policy.
    pub fn new(config: &SimConfig, policy: Box<dyn DispatchPolicy>) -> Self {
        Self {
            servers: config.build_servers(),
            policy,
            rng: ChaCha8Rng::seed_from_u64(config.simulation.seed),
            mean_interarrival: config.workload.mean_interarrival,
            mean_service: config.workload.mean_service,
            snapshot_interval: config.workload.snapshot_interval,
            current_time: 0.0,
            next_snapshot_time: config.workload.snapshot_interval,
            completions: BinaryHeap::new(),
            sequence: 0,
            load_over_time: Vec::new(),
        }
    }

    /// Run the simulation to exhaustion and return the final simulated time.
    ///
    /// Generates `num_requests` arrivals, then drains every remaining
    /// completion. When `model_service_time` is false no completion events
    /// exist and active loads only ever grow.
    pub fn run(&mut self, num_requests: u64, model_service_time: bool) -> f64 {
        // The log always starts with a time-zero observation.
        self.record_snapshot(0.0);

        for _ in 0..num_requests {
            let interarrival = self.exp_sample(self.mean_interarrival);
            self.current_time += interarrival;

            self.drain_due_completions();
            self.catch_up_snapshots();

            let chosen = self.select_server();
            let service_time = if model_service_time {
                self.exp_sample(self.mean_service)
            } else {
                0.0
            };
            self.servers[chosen].assign_request(service_time);

            if model_service_time {
                self.schedule_completion(self.current_time + service_time, chosen);
            }
        }

        // Tail drain: consume the remaining heap in time order, advancing
        // the clock to each completion and flushing any snapshots now due.
        while let Some(event) = self.completions.pop() {
            self.current_time = self.current_time.max(event.time);
            self.servers[event.server].complete_request();
            self.catch_up_snapshots();
        }

        self.current_time
    }

    /// Sample from an exponential distribution with the given mean,
    /// consuming one uniform draw from the engine's stream.
    fn exp_sample(&mut self, mean: f64) -> f64 {
        let u: f64 = self.rng.gen::<f64>().max(MIN_UNIFORM_DRAW);
        -mean * u.ln()
    }

    /// Ask the policy for a server, handing it fresh snapshots and the
    /// engine's random stream.
    fn select_server(&mut self) -> usize {
        let snapshots: Vec<ServerSnapshot> = self
            .servers
            .iter()
            .enumerate()
            .map(|(i, s)| s.snapshot(i))
            .collect();
        self.policy.select(&snapshots, &mut self.rng)
    }

    /// Apply every completion due at or before the current time.
    fn drain_due_completions(&mut self) {
        while let Some(event) = self.completions.peek().copied() {
            if event.time > self.current_time {
                break;
            }
            self.completions.pop();
            self.servers[event.server].complete_request();
        }
    }

    /// Record a snapshot for every interval boundary the clock has crossed.
    ///
    /// Snapshots are taken at the boundary time, not the current time, so a
    /// single long interarrival gap can emit several rows at exact interval
    /// multiples. Loads reflect whatever completions have been drained by
    /// now; no interpolation back to the boundary instant.
    fn catch_up_snapshots(&mut self) {
        while self.current_time >= self.next_snapshot_time {
            self.record_snapshot(self.next_snapshot_time);
            self.next_snapshot_time += self.snapshot_interval;
        }
    }

    fn record_snapshot(&mut self, time: f64) {
        self.load_over_time
            .push(LoadSnapshot::capture(time, &self.servers));
    }

    fn schedule_completion(&mut self, time: f64, server: usize) {
        self.completions.push(CompletionEvent {
            time,
            server,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    /// The ordered snapshot log.
    pub fn load_over_time(&self) -> &[LoadSnapshot] {
        &self.load_over_time
    }

    /// Consume the engine, keeping only the snapshot log.
    pub fn into_load_over_time(self) -> Vec<LoadSnapshot> {
        self.load_over_time
    }

    /// Number of completions still pending.
    pub fn pending_completions(&self) -> usize {
        self.completions.len()
    }

    /// Name of the dispatch policy in use.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }
}
