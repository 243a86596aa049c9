//! Deployment configuration.

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::energy::EnergyParams;

/// What happens to a robot's sensor stock when a new location area is
/// assigned.
///
/// The deployment study leaves this open; both policies are useful, so it is
/// a configuration choice rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Stock carries over between location areas.
    #[default]
    Persist,
    /// Stock is restored to `initial_stock` on every new assignment.
    Reset,
}

/// Top-level deployment configuration.
///
/// All parameters the coverage algorithm consumes are supplied here; nothing
/// is derived internally. Defaults match the reference scenario: a 1 km
/// square, robots perceiving 100 m, sensors perceiving 50 m, two robots each
/// starting with 10 of 15 stock slots filled. Loaded from JSON at runtime or
/// built in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Side of the square target area, meters.
    pub area_size: f64,
    /// Robot perception range (location-area side), meters.
    pub robot_range: f64,
    /// Sensor perception range (grid side), meters.
    pub sensor_range: f64,
    /// Radio range within which a sensor hears a discovery request, meters.
    pub comm_range: f64,
    /// Number of mobile robots.
    pub robot_count: u8,
    /// Maximum sensors a robot can carry.
    pub stock_capacity: u8,
    /// Sensors each robot carries at startup.
    pub initial_stock: u8,
    /// Cap on location areas for the whole target area.
    pub max_location_areas: usize,
    /// Cap on grids per location area.
    pub max_grids_per_area: usize,
    /// How long a robot collects discovery replies, milliseconds.
    pub discovery_window_ms: u64,
    /// Extra sends of each critical message (assignments, reports).
    pub resend_attempts: u32,
    /// Delay between resends, milliseconds.
    pub resend_delay_ms: u64,
    /// Stock handling across location-area assignments.
    pub stock_policy: StockPolicy,
    /// Keep replies that arrive after the discovery window closes and fold
    /// them into the robot's next discovery pass instead of dropping them.
    pub accept_late_replies: bool,
    /// Energy coefficients for the base station.
    pub base_energy: EnergyParams,
    /// Energy coefficients for robots.
    pub robot_energy: EnergyParams,
    /// Energy coefficients for sensor nodes.
    pub sensor_energy: EnergyParams,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            area_size: 1000.0,
            robot_range: 100.0,
            sensor_range: 50.0,
            comm_range: 100.0,
            robot_count: 2,
            stock_capacity: 15,
            initial_stock: 10,
            max_location_areas: 20,
            max_grids_per_area: 50,
            discovery_window_ms: 200,
            resend_attempts: 3,
            resend_delay_ms: 50,
            stock_policy: StockPolicy::Persist,
            accept_late_replies: false,
            base_energy: EnergyParams::base_station(),
            robot_energy: EnergyParams::robot(),
            sensor_energy: EnergyParams::sensor(),
        }
    }
}

impl DeploymentConfig {
    /// Reject configurations the simulation cannot run with.
    ///
    /// A `robot_range` smaller than `sensor_range` is allowed: it degenerates
    /// to zero grids per area, which the algorithm handles.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.area_size > 0.0) {
            bail!("area_size must be positive, got {}", self.area_size);
        }
        if !(self.robot_range > 0.0) || !(self.sensor_range > 0.0) {
            bail!(
                "perception ranges must be positive, got robot={} sensor={}",
                self.robot_range,
                self.sensor_range
            );
        }
        if !(self.comm_range > 0.0) {
            bail!("comm_range must be positive, got {}", self.comm_range);
        }
        if self.robot_count == 0 {
            bail!("at least one robot is required");
        }
        if self.initial_stock > self.stock_capacity {
            bail!(
                "initial_stock {} exceeds stock_capacity {}",
                self.initial_stock,
                self.stock_capacity
            );
        }
        if self.max_location_areas == 0 || self.max_grids_per_area == 0 {
            bail!("location-area and grid caps must be nonzero");
        }
        Ok(())
    }
}
