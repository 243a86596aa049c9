//! Deployment simulation CLI.
//!
//! Commands:
//! - run: Drive a full deployment scenario and print the coverage result
//! - plan: Print the location-area and grid layout for a configuration

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use coverage_kernel::grid::{grids_per_area, partition_areas, partition_grids};
use coverage_kernel::{DeploymentConfig, StockPolicy};
use deployment_sim::results::RunRecord;
use deployment_sim::scenario::Scenario;

/// Generate a timestamped output path from the given path.
/// e.g., "results.json" -> "results-20260108-010530.json"
fn timestamped_path(path: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("results");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}-{}.{}", stem, timestamp, ext))
}

#[derive(Parser)]
#[command(name = "deployment-sim")]
#[command(version)]
#[command(about = "Robot-assisted sensor network deployment simulator")]
struct Cli {
    /// Base configuration file (JSON); flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Geometry and fleet flags shared by both commands.
#[derive(Debug, Clone, clap::Args)]
struct ConfigArgs {
    /// Side of the square target area in meters
    #[arg(long)]
    area_size: Option<f64>,

    /// Robot perception range in meters (location-area side)
    #[arg(long)]
    robot_range: Option<f64>,

    /// Sensor perception range in meters (grid side)
    #[arg(long)]
    sensor_range: Option<f64>,

    /// Number of mobile robots
    #[arg(long)]
    robots: Option<u8>,

    /// Sensors each robot carries at startup
    #[arg(long)]
    stock: Option<u8>,

    /// Maximum sensors a robot can carry
    #[arg(long)]
    capacity: Option<u8>,

    /// Stock handling across assignments: persist or reset
    #[arg(long)]
    stock_policy: Option<String>,
}

impl ConfigArgs {
    /// Layer these flags over a base configuration.
    fn apply(&self, mut config: DeploymentConfig) -> Result<DeploymentConfig> {
        if let Some(v) = self.area_size {
            config.area_size = v;
        }
        if let Some(v) = self.robot_range {
            config.robot_range = v;
        }
        if let Some(v) = self.sensor_range {
            config.sensor_range = v;
        }
        if let Some(v) = self.robots {
            config.robot_count = v;
        }
        if let Some(v) = self.stock {
            config.initial_stock = v;
        }
        if let Some(v) = self.capacity {
            config.stock_capacity = v;
        }
        if let Some(policy) = &self.stock_policy {
            config.stock_policy = parse_stock_policy(policy)?;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a deployment scenario
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Number of sensors to scatter over the area
        #[arg(long, default_value = "25")]
        sensors: usize,

        /// Random seed for sensor placement
        #[arg(long)]
        seed: Option<u64>,

        /// Output file for the run record
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the area and grid layout without running
    Plan {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let base_config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            config,
            sensors,
            seed,
            output,
        } => {
            let config = config.apply(base_config)?;
            config.validate()?;

            let seed = seed.unwrap_or_else(rand::random);
            let scenario = Scenario {
                config: config.clone(),
                sensor_count: sensors,
                seed,
            };

            let started_at = Utc::now();
            let outcome = scenario.run().await?;
            let summary = &outcome.summary;

            println!("\n=== Deployment Result ===");
            println!("Location areas: {}", summary.total_areas);
            println!("Grids per area: {}", summary.grids_per_area);
            println!(
                "Covered grids: {}/{}",
                summary.covered_grids, summary.total_grids
            );
            println!("Coverage: {:.2}%", summary.coverage_percent);
            println!("Sensors scattered: {} (seed {})", sensors, seed);
            println!("Elapsed: {} ms", outcome.elapsed.as_millis());

            println!("\nPer-area coverage:");
            println!("  {:>4} {:>8}", "Area", "Covered");
            for area in &summary.areas {
                println!("  {:>4} {:>8}", area.la_id, area.covered_grids);
            }

            if let Some(output) = output {
                let record = RunRecord::new(
                    seed,
                    sensors,
                    outcome.elapsed.as_millis() as u64,
                    config,
                    outcome.summary,
                    started_at,
                );
                let output_path = timestamped_path(&output);
                record.save(&output_path)?;
                println!("\nRun record saved to: {}", output_path.display());
            }
        }

        Commands::Plan { config } => {
            let config = config.apply(base_config)?;
            config.validate()?;

            let areas = partition_areas(
                config.area_size,
                config.robot_range,
                config.max_location_areas,
            );
            let per_area = grids_per_area(
                config.robot_range,
                config.sensor_range,
                config.max_grids_per_area,
            );

            println!("Target area: {0} x {0} m", config.area_size);
            println!(
                "Location areas: {} ({} grids each, {} total)",
                areas.len(),
                per_area,
                areas.len() * per_area
            );
            for area in &areas {
                println!("  LA {:>3} centered at {}", area.id, area.center);
            }

            if let Some(first) = areas.first() {
                let grids = partition_grids(
                    first.center,
                    config.robot_range,
                    config.sensor_range,
                    config.max_grids_per_area,
                );
                println!("\nGrid layout of LA {}:", first.id);
                for grid in &grids {
                    println!("  grid {:>3} centered at {}", grid.id, grid.center);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DeploymentConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(DeploymentConfig::default()),
    }
}

fn parse_stock_policy(s: &str) -> Result<StockPolicy> {
    match s.to_lowercase().as_str() {
        "persist" => Ok(StockPolicy::Persist),
        "reset" => Ok(StockPolicy::Reset),
        _ => anyhow::bail!("Unknown stock policy: {}. Valid: persist, reset", s),
    }
}
