//! Wiring a deployment: spawn the base station, sensor field and robots.
//!
//! ## Usage
//!
//! ```ignore
//! use coverage_kernel::{DeploymentBuilder, DeploymentConfig, SensorSeed};
//! use acton_reactive::prelude::*;
//!
//! let mut runtime = ActonApp::launch_async().await;
//!
//! let station = DeploymentBuilder::new(config)
//!     .with_sensors(seeds)
//!     .spawn(&mut runtime)
//!     .await;
//!
//! // Register a driver to receive DeploymentComplete, then wait for it.
//! station.send(RegisterReportDriver { handle: driver }).await;
//! ```

use acton_reactive::prelude::*;
use serde::Serialize;

use crate::actors::{BaseStation, Robot, SensorNode};
use crate::config::DeploymentConfig;
use crate::grid::AreaId;
use crate::registry::{SensorId, SensorStatus};
use crate::spatial::Point;

/// Initial placement of one sensor node in the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSeed {
    pub id: SensorId,
    pub position: Point,
    pub status: SensorStatus,
}

/// Final per-area outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaOutcome {
    pub la_id: AreaId,
    pub covered_grids: u16,
}

/// Final result of a deployment run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageSummary {
    pub total_areas: usize,
    pub grids_per_area: usize,
    pub covered_grids: u32,
    pub total_grids: u32,
    /// `covered / (areas * grids_per_area) * 100`, zero when the partition
    /// is degenerate.
    pub coverage_percent: f64,
    pub areas: Vec<AreaOutcome>,
}

/// Builder that spawns all deployment actors in dependency order.
///
/// The base station goes first so its subscriptions are live, then the
/// sensor field, then the robots; each robot's `RobotReady` broadcast
/// triggers its first assignment.
pub struct DeploymentBuilder {
    config: DeploymentConfig,
    sensors: Vec<SensorSeed>,
}

impl DeploymentBuilder {
    /// Create a builder for the given configuration.
    pub fn new(config: DeploymentConfig) -> Self {
        Self {
            config,
            sensors: Vec::new(),
        }
    }

    /// Add one pre-deployed sensor.
    pub fn add_sensor(mut self, seed: SensorSeed) -> Self {
        self.sensors.push(seed);
        self
    }

    /// Add a batch of pre-deployed sensors.
    pub fn with_sensors(mut self, seeds: impl IntoIterator<Item = SensorSeed>) -> Self {
        self.sensors.extend(seeds);
        self
    }

    /// Spawn the whole node set and return the base station's handle.
    ///
    /// Send `RegisterReportDriver` to the returned handle to receive the
    /// `DeploymentComplete` message when the global phase finishes.
    pub async fn spawn(self, runtime: &mut ActorRuntime) -> ActorHandle {
        let config = self.config;

        let station = BaseStation::new(config.clone()).spawn(runtime).await;

        for seed in self.sensors {
            SensorNode {
                sensor_id: seed.id,
                position: seed.position,
                status: seed.status,
                comm_range: config.comm_range,
                sensor_range: config.sensor_range,
                energy_params: config.sensor_energy.clone(),
            }
            .spawn(runtime)
            .await;
        }

        for robot_id in 0..config.robot_count {
            Robot::new(robot_id, config.clone()).spawn(runtime).await;
        }

        station
    }
}
