//! Coverage Kernel: two-phase deployment of a wireless sensor network by
//! mobile robots.
//!
//! A base station partitions the disaster area into location areas and
//! assigns them to robots; each robot partitions its area into grids,
//! discovers the sensors already scattered there and redistributes them
//! under a strict movement budget.

pub mod actors;
pub mod config;
pub mod deployment;
pub mod dispersion;
pub mod energy;
pub mod grid;
pub mod messages;
pub mod registry;
pub mod spatial;

pub use config::{DeploymentConfig, StockPolicy};
pub use deployment::{CoverageSummary, DeploymentBuilder, SensorSeed};
pub use dispersion::{DispersionEngine, DispersionReport, GridAction};
pub use grid::{Grid, LocationArea};
pub use registry::{SensorRegistry, SensorStatus};
pub use spatial::Point;
