//! Scenario construction and the run harness.
//!
//! A scenario is a deployment configuration plus a seeded random scatter of
//! sensors over the target area. Running it spins up the full actor system,
//! waits for the base station's completion message and tears the runtime
//! down again.

use std::time::{Duration, Instant};

use acton_reactive::prelude::*;
use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::info;

use coverage_kernel::deployment::CoverageSummary;
use coverage_kernel::grid::partition_areas;
use coverage_kernel::messages::RegisterReportDriver;
use coverage_kernel::registry::SensorStatus;
use coverage_kernel::{DeploymentBuilder, DeploymentConfig, Point, SensorSeed};

use crate::driver::ReportDriver;

/// One reproducible simulation setup.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub config: DeploymentConfig,
    /// Sensors scattered over the area before the robots start.
    pub sensor_count: usize,
    /// Seed for the scatter; same seed, same field.
    pub seed: u64,
}

/// Result of driving one scenario to completion.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: CoverageSummary,
    pub elapsed: Duration,
}

impl Scenario {
    /// Scatter `sensor_count` idle sensors uniformly over the target area.
    ///
    /// Deterministic for a fixed seed; sensor ids are assigned sequentially
    /// from 1 in generation order.
    pub fn place_sensors(&self) -> Vec<SensorSeed> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let size = self.config.area_size;
        (1..=self.sensor_count)
            .map(|id| SensorSeed {
                id: id as u16,
                position: Point::new(rng.gen_range(0.0..size), rng.gen_range(0.0..size)),
                status: SensorStatus::Idle,
            })
            .collect()
    }

    /// Upper bound on how long a full deployment may take before the harness
    /// gives up: every area pays a discovery window plus the resend delays,
    /// with a generous constant floor.
    fn completion_deadline(&self) -> Duration {
        let areas = partition_areas(
            self.config.area_size,
            self.config.robot_range,
            self.config.max_location_areas,
        )
        .len() as u64;
        let per_area = self.config.discovery_window_ms
            + u64::from(self.config.resend_attempts) * self.config.resend_delay_ms
            + 200;
        Duration::from_millis(5_000 + areas * per_area)
    }

    /// Run the scenario to completion.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.config.validate()?;
        let started = Instant::now();

        let sensors = self.place_sensors();
        info!(
            sensors = sensors.len(),
            robots = self.config.robot_count,
            seed = self.seed,
            "Starting deployment scenario"
        );

        let mut runtime = ActonApp::launch_async().await;

        let (tx, mut rx) = mpsc::channel(1);
        let driver = ReportDriver::new(tx).spawn(&mut runtime).await;

        let station = DeploymentBuilder::new(self.config.clone())
            .with_sensors(sensors)
            .spawn(&mut runtime)
            .await;
        station
            .send(RegisterReportDriver { handle: driver })
            .await;

        let deadline = self.completion_deadline();
        let summary = tokio::time::timeout(deadline, rx.recv())
            .await
            .context("deployment did not complete within the deadline")?
            .context("report channel closed before completion")?;

        let _ = runtime.shutdown_all().await;

        let elapsed = started.elapsed();
        info!(
            coverage = format!("{:.2}%", summary.coverage_percent),
            covered = summary.covered_grids,
            total = summary.total_grids,
            elapsed_ms = elapsed.as_millis() as u64,
            "Scenario complete"
        );

        Ok(RunOutcome { summary, elapsed })
    }
}
