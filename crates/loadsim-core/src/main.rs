//! loadsim CLI — Compare load balancer dispatch policies without servers.

use clap::{Parser, Subcommand};
use loadsim_core::config::SimConfig;
use loadsim_core::fixed_step::{self, FixedStepSimulation, TickRequest};
use loadsim_core::report;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "loadsim",
    about = "Simulate load balancer dispatch policies",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an event-driven simulation from a TOML config.
    Run {
        /// Path to TOML configuration file.
        #[arg(short, long)]
        config: PathBuf,
        /// Dispatch policy name.
        #[arg(short, long, default_value = "weighted_random")]
        policy: String,
        /// Write the load-over-time series to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the run report to a JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Run this plotting script over the exported CSV.
        #[arg(long, requires = "csv")]
        plot: Option<PathBuf>,
    },
    /// Run the fixed-time-step round-robin simulation.
    FixedStep {
        /// Number of servers.
        #[arg(long, default_value = "5")]
        servers: usize,
        /// Number of requests.
        #[arg(long, default_value = "100")]
        requests: u64,
        /// Maximum per-request processing time in work units.
        #[arg(long, default_value = "50")]
        max_processing_time: u32,
        /// Tick once every N requests.
        #[arg(long, default_value = "10")]
        tick_every: u64,
        /// Work units drained per tick.
        #[arg(long, default_value = "5")]
        tick_units: u32,
        /// Random seed for processing times.
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Write assignment log and load history to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List available dispatch policies.
    ListPolicies,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            policy,
            csv,
            output,
            plot,
        } => {
            let sim_config = SimConfig::from_file(&config).unwrap_or_else(|e| {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            });

            let dispatch = loadsim_policies::policy_by_name(&policy).unwrap_or_else(|| {
                eprintln!(
                    "Unknown policy: {}. Available: {:?}",
                    policy,
                    loadsim_policies::available_policies()
                );
                std::process::exit(1);
            });

            let outcome = loadsim_core::run_simulation(&sim_config, dispatch);
            println!("{}", report::format_table(&outcome.report));

            // Export failures are reported but never discard the results.
            if let Some(csv_path) = &csv {
                match report::write_load_csv(&outcome.load_over_time, &outcome.server_ids, csv_path)
                {
                    Ok(()) => println!("Time-series data written to {}", csv_path.display()),
                    Err(e) => eprintln!("Error writing CSV: {}", e),
                }
            }

            if let Some(output_path) = &output {
                match serde_json::to_string_pretty(&outcome.report) {
                    Ok(json) => match std::fs::write(output_path, json) {
                        Ok(()) => println!("Report written to {}", output_path.display()),
                        Err(e) => eprintln!("Error writing report: {}", e),
                    },
                    Err(e) => eprintln!("Error serializing report: {}", e),
                }
            }

            if let (Some(script), Some(csv_path)) = (&plot, &csv) {
                println!("Running plot script...");
                match report::run_plot_script(script, csv_path) {
                    Ok(()) => println!("Graph generated successfully."),
                    Err(e) => eprintln!("Error running plot script: {}", e),
                }
            }
        }
        Commands::FixedStep {
            servers,
            requests,
            max_processing_time,
            tick_every,
            tick_units,
            seed,
            csv,
        } => {
            use rand::Rng;
            use rand::SeedableRng;
            use rand_chacha::ChaCha8Rng;

            if servers == 0 {
                eprintln!("Error: at least one server is required");
                std::process::exit(1);
            }
            if max_processing_time == 0 {
                eprintln!("Error: max-processing-time must be at least 1");
                std::process::exit(1);
            }

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut sim = FixedStepSimulation::new(servers);

            println!("=== Fixed-Step Round Robin Simulation ===");
            println!("Servers: {}, Requests: {}, Seed: {}", servers, requests, seed);

            for i in 0..requests {
                let processing_time = rng.gen_range(1..=max_processing_time);
                sim.dispatch(TickRequest {
                    id: i,
                    processing_time,
                });
                if tick_every > 0 && i % tick_every == 0 {
                    sim.tick(tick_units);
                }
            }

            println!("{}", fixed_step::format_stats(&sim));

            if let Some(csv_path) = &csv {
                match sim.export_csv(csv_path) {
                    Ok(()) => println!("Data exported to {}", csv_path.display()),
                    Err(e) => eprintln!("Error writing CSV: {}", e),
                }
            }
        }
        Commands::ListPolicies => {
            println!("Available dispatch policies:");
            for name in loadsim_policies::available_policies() {
                println!("  - {}", name);
            }
        }
    }
}
