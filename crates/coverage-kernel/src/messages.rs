//! Message types exchanged between the deployment actors.
//!
//! Every inter-node interaction is a typed message decoded once at the actor
//! boundary; nothing downstream inspects raw payloads. Broadcast-shaped
//! traffic (assignments, discovery, replies, reports) goes through the broker
//! and receivers filter by their own id, mirroring radio broadcast.
//! Discovery uses correlation IDs so replies from a closed window are
//! recognizably stale.

use crate::grid::AreaId;
use crate::registry::{SensorId, SensorStatus};
use crate::spatial::Point;

/// Identifier of a mobile robot.
pub type RobotId = u8;

/// Notification that a robot is idle and ready for work - broadcast by robot
/// actors on start. The base station answers with an `LaAssignment`.
#[derive(Debug, Clone)]
pub struct RobotReady {
    pub robot_id: RobotId,
}

/// Location-area assignment - base station to one robot.
///
/// Broadcast; robots ignore assignments addressed to other ids. Resent a
/// bounded number of times, so receivers must tolerate duplicates.
#[derive(Debug, Clone)]
pub struct LaAssignment {
    /// The robot this assignment is for.
    pub robot_id: RobotId,
    pub la_id: AreaId,
    pub center: Point,
}

/// Discovery probe - robot to all sensors in earshot.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Correlation ID of the robot's current discovery window.
    pub correlation_id: String,
    pub robot_id: RobotId,
    /// Robot position, so sensors can tell whether they are in earshot.
    pub position: Point,
}

/// A sensor answering a discovery probe.
#[derive(Debug, Clone)]
pub struct DiscoveryReply {
    /// Correlation ID copied from the request.
    pub correlation_id: String,
    /// The robot that asked.
    pub robot_id: RobotId,
    pub sensor_id: SensorId,
    pub position: Point,
    pub status: SensorStatus,
}

/// Robot-internal timer: the discovery window for `correlation_id` elapsed.
///
/// Replies carrying this correlation ID that arrive after this message are
/// late and handled per the late-reply policy.
#[derive(Debug, Clone)]
pub struct DiscoveryWindowClosed {
    pub robot_id: RobotId,
    pub correlation_id: String,
}

/// Deploy or relocate order - robot to sensors.
///
/// With `sensor_id` set, the addressed sensor moves to `target` and
/// activates. With `sensor_id` unset the robot is deploying a fresh unit
/// from its carried stock; existing nodes ignore it.
#[derive(Debug, Clone)]
pub struct RedeployCommand {
    pub sensor_id: Option<SensorId>,
    pub target: Point,
    pub from_stock: bool,
}

/// Local-phase result - robot to base station.
///
/// `la_id` identifies which area the count belongs to: reports are resent a
/// bounded number of times and the robot may already hold a new assignment
/// when a duplicate arrives, so the pair (robot, area) is the idempotency
/// key.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub robot_id: RobotId,
    pub la_id: AreaId,
    pub covered_grids: u16,
}

/// Register the completion driver handle with the base station.
///
/// The base station sends `DeploymentComplete` to this handle once every
/// location area has been processed.
#[derive(Debug, Clone)]
pub struct RegisterReportDriver {
    pub handle: acton_reactive::prelude::ActorHandle,
}

/// Final result of a deployment - sent to the registered driver.
#[derive(Debug, Clone)]
pub struct DeploymentComplete {
    pub summary: crate::deployment::CoverageSummary,
}
