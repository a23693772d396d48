//! TOML configuration parsing for loadsim.
//!
//! Defines the configuration schema for simulation runs: general run
//! parameters, the stochastic workload, and the server pool. Validation
//! happens at parse time, before any simulated time advances.

use crate::server::Server;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub simulation: SimulationSection,
    #[serde(default)]
    pub workload: WorkloadSection,
    pub servers: Vec<ServerSection>,
}

/// General simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Human-readable name for this simulation.
    #[serde(default = "default_sim_name")]
    pub name: String,
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of arrivals to generate.
    #[serde(default = "default_num_requests")]
    pub num_requests: u64,
    /// When false, every assignment completes instantly and no completion
    /// events are scheduled.
    #[serde(default = "default_model_service_time")]
    pub model_service_time: bool,
}

fn default_sim_name() -> String {
    "simulation".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_num_requests() -> u64 {
    1000
}

fn default_model_service_time() -> bool {
    true
}

/// Stochastic workload parameters. Interarrival and service durations are
/// drawn from independent exponential distributions with these means.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSection {
    #[serde(default = "default_mean_interarrival")]
    pub mean_interarrival: f64,
    #[serde(default = "default_mean_service")]
    pub mean_service: f64,
    /// Simulated time between load snapshots.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: f64,
}

fn default_mean_interarrival() -> f64 {
    1.0
}

fn default_mean_service() -> f64 {
    3.0
}

fn default_snapshot_interval() -> f64 {
    1.0
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            mean_interarrival: default_mean_interarrival(),
            mean_service: default_mean_service(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

/// One server declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    pub id: String,
    pub weight: u32,
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one server must be declared".to_string(),
            ));
        }
        for server in &self.servers {
            if server.weight == 0 {
                return Err(ConfigError::Validation(format!(
                    "server {} has weight 0; weights must be positive",
                    server.id
                )));
            }
        }
        if self.workload.mean_interarrival <= 0.0 {
            return Err(ConfigError::Validation(
                "mean_interarrival must be > 0".to_string(),
            ));
        }
        if self.workload.mean_service <= 0.0 {
            return Err(ConfigError::Validation(
                "mean_service must be > 0".to_string(),
            ));
        }
        if self.workload.snapshot_interval <= 0.0 {
            return Err(ConfigError::Validation(
                "snapshot_interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the server pool in declaration order.
    pub fn build_servers(&self) -> Vec<Server> {
        self.servers
            .iter()
            .map(|s| Server::new(s.id.clone(), s.weight))
            .collect()
    }
}
