//! Actor implementations for the deployment nodes.
//!
//! One actor per node: the base station coordinates the global phase, each
//! robot runs its local phases, each sensor node answers discovery probes
//! and redeploy orders. Nodes share no state; everything crosses the broker
//! as typed messages.

mod base_station;
mod robot;
mod sensor_node;

pub use base_station::BaseStation;
pub use robot::{Robot, RobotPhase};
pub use sensor_node::SensorNode;
