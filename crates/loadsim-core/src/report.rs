//! Reporting and export for simulation runs.
//!
//! Consumes the engine's results after a run: writes the load-over-time
//! series as CSV, computes the per-server summary (request share and
//! utilization), formats a console table, and optionally hands the CSV to
//! an external plotting script. Export failures never invalidate the
//! simulation results themselves.

use crate::engine::SimulationEngine;
use crate::snapshot::LoadSnapshot;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Plot script exited with status {0}")]
    PlotFailed(i32),
}

/// Summary counters for one server after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSummary {
    pub id: String,
    pub weight: u32,
    pub handled_requests: u64,
    /// Share of all handled requests, in percent.
    pub share_pct: f64,
    /// Accumulated service time divided by the final simulated time.
    /// Exceeds 1.0 when the offered load exceeds the server's capacity.
    pub utilization: f64,
}

/// Aggregated results of a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Dispatch policy name.
    pub policy: String,
    /// Final simulated time.
    pub final_time: f64,
    /// Total requests dispatched across all servers.
    pub total_requests: u64,
    /// Per-server summaries in declaration order.
    pub servers: Vec<ServerSummary>,
}

impl RunReport {
    /// Build the summary from a finished engine.
    pub fn from_engine(engine: &SimulationEngine, final_time: f64) -> Self {
        let total: u64 = engine.servers.iter().map(|s| s.handled_requests).sum();
        let servers = engine
            .servers
            .iter()
            .map(|s| ServerSummary {
                id: s.id.clone(),
                weight: s.weight,
                handled_requests: s.handled_requests,
                share_pct: 100.0 * s.handled_requests as f64 / total.max(1) as f64,
                utilization: if final_time > 0.0 {
                    s.total_service_time / final_time
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            policy: engine.policy_name().to_string(),
            final_time,
            total_requests: total,
            servers,
        }
    }
}

/// Write the load-over-time series as CSV: a `time` column followed by one
/// active-load column per server, in declaration order. Times are written
/// with three decimals.
pub fn write_load_csv(
    snapshots: &[LoadSnapshot],
    server_ids: &[String],
    path: &Path,
) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    write!(writer, "time")?;
    for id in server_ids {
        write!(writer, ",{}", id)?;
    }
    writeln!(writer)?;

    for snap in snapshots {
        write!(writer, "{:.3}", snap.time)?;
        for load in &snap.loads {
            write!(writer, ",{}", load)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Format a run report as a console table.
pub fn format_table(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{:=<60}\n",
        format!("  {} Results  ", report.policy)
    ));
    out.push_str(&format!(
        "  Final time: {:.3} | Requests: {}\n",
        report.final_time, report.total_requests
    ));
    out.push_str(&format!("{:-<60}\n", "  Load Distribution  "));
    for server in &report.servers {
        out.push_str(&format!(
            "  {}(w={})  handled={:>6} ({:>5.1}%)  util={:.3}\n",
            server.id, server.weight, server.handled_requests, server.share_pct, server.utilization
        ));
    }
    out.push_str(&format!("{:=<60}\n", ""));
    out
}

/// Run an external plotting script over an exported CSV, streaming its
/// output line by line. A missing interpreter or a non-zero exit is
/// reported to the caller; the simulation results are unaffected either
/// way.
pub fn run_plot_script(script: &Path, csv: &Path) -> Result<(), ReportError> {
    let mut child = Command::new("python")
        .arg(script)
        .arg(csv)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            println!("[plot] {}", line?);
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(ReportError::PlotFailed(status.code().unwrap_or(-1)));
    }
    Ok(())
}
