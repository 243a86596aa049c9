//! Robot: the local-phase controller as an actor.
//!
//! Each robot cycles Idle -> Discovering -> Dispersing -> Reporting -> Idle:
//! 1. On `LaAssignment`: move to the area center, broadcast a discovery
//!    probe, open a timed reply window keyed by a fresh correlation ID
//! 2. Collect `DiscoveryReply` broadcasts into the sensor registry
//! 3. On `DiscoveryWindowClosed`: partition the area into grids and run the
//!    dispersion engine to completion, then broadcast redeploy orders and
//!    the coverage report (with bounded resends)
//!
//! Dispersion runs to completion inside the window-closed handler; the
//! mailbox serializes it against any other traffic for this robot.

use std::time::Instant;

use acton_reactive::prelude::*;
use mti::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{DeploymentConfig, StockPolicy};
use crate::dispersion::DispersionEngine;
use crate::energy::{EnergyMeter, EnergyParams};
use crate::grid::{partition_grids, AreaId};
use crate::messages::{
    CoverageReport, DiscoveryReply, DiscoveryRequest, DiscoveryWindowClosed, LaAssignment,
    RedeployCommand, RobotId, RobotReady,
};
use crate::registry::{IngestOutcome, SensorRegistry};
use crate::spatial::Point;

/// Operational phase of a robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotPhase {
    /// Waiting for a location-area assignment.
    #[default]
    Idle,
    /// Collecting discovery replies for the current window.
    Discovering,
    /// Working through grids with the dispersion engine.
    Dispersing,
    /// Sending the coverage report.
    Reporting,
}

/// Actor state for a mobile robot.
#[derive(Debug, Clone)]
pub struct RobotActorState {
    robot_id: RobotId,
    config: Option<DeploymentConfig>,
    phase: RobotPhase,
    position: Point,
    stock: u8,
    /// Current assignment: area id and center.
    assignment: Option<(AreaId, Point)>,
    /// Correlation ID of the open discovery window.
    discovery: Option<String>,
    registry: SensorRegistry,
    /// Replies that arrived after their window closed, kept only when the
    /// late-reply policy says so.
    late_replies: Vec<DiscoveryReply>,
    /// Last area this robot finished, to ignore stale duplicate assignments.
    last_completed: Option<AreaId>,
    phase_started: Option<Instant>,
    energy: EnergyMeter,
    areas_completed: u16,
}

impl Default for RobotActorState {
    fn default() -> Self {
        Self {
            robot_id: 0,
            config: None,
            phase: RobotPhase::Idle,
            position: Point::default(),
            stock: 0,
            assignment: None,
            discovery: None,
            registry: SensorRegistry::new(),
            late_replies: Vec::new(),
            last_completed: None,
            phase_started: None,
            energy: EnergyMeter::new(EnergyParams::robot()),
            areas_completed: 0,
        }
    }
}

/// A mobile robot carrying spare sensors.
///
/// Robots announce themselves with `RobotReady` on start and afterwards only
/// react to messages; the base station drives them through assignments.
pub struct Robot {
    pub robot_id: RobotId,
    pub config: DeploymentConfig,
}

impl Robot {
    /// Create a new robot.
    pub fn new(robot_id: RobotId, config: DeploymentConfig) -> Self {
        Self { robot_id, config }
    }

    /// Spawn this robot in the given runtime.
    ///
    /// The robot starts at the middle of the target area with
    /// `initial_stock` sensors on board.
    pub async fn spawn(self, runtime: &mut ActorRuntime) -> ActorHandle {
        let mut actor =
            runtime.new_actor_with_name::<RobotActorState>(format!("Robot:{}", self.robot_id));

        actor.model.robot_id = self.robot_id;
        actor.model.stock = self.config.initial_stock.min(self.config.stock_capacity);
        actor.model.position =
            Point::new(self.config.area_size / 2.0, self.config.area_size / 2.0);
        actor.model.energy = EnergyMeter::new(self.config.robot_energy.clone());
        actor.model.config = Some(self.config);

        // Subscribe to broadcast traffic BEFORE starting
        actor.handle().subscribe::<LaAssignment>().await;
        actor.handle().subscribe::<DiscoveryReply>().await;
        actor.handle().subscribe::<DiscoveryWindowClosed>().await;

        // Announce readiness so the base station hands out the first area
        actor.after_start(|actor| {
            let broker = actor.broker().clone();
            let robot_id = actor.model.robot_id;

            Reply::pending(async move {
                broker.broadcast(RobotReady { robot_id }).await;
            })
        });

        configure_handlers(&mut actor);

        actor.start().await
    }
}

/// Configure all message handlers for the robot.
fn configure_handlers(actor: &mut ManagedActor<Idle, RobotActorState>) {
    // Handle LaAssignment - move to the area and open the discovery window
    actor.mutate_on::<LaAssignment>(|actor, context| {
        let msg = context.message().clone();
        if msg.robot_id != actor.model.robot_id {
            return Reply::ready();
        }
        actor.model.energy.record_rx();

        let Some(config) = actor.model.config.clone() else {
            warn!(robot = actor.model.robot_id, "Robot: config not initialized");
            return Reply::ready();
        };

        if actor.model.phase != RobotPhase::Idle {
            debug!(
                robot = actor.model.robot_id,
                la = msg.la_id,
                phase = ?actor.model.phase,
                "Busy, ignoring assignment"
            );
            return Reply::ready();
        }
        if actor.model.last_completed == Some(msg.la_id) {
            debug!(
                robot = actor.model.robot_id,
                la = msg.la_id,
                "Duplicate assignment for a finished area, ignoring"
            );
            return Reply::ready();
        }

        if config.stock_policy == StockPolicy::Reset {
            actor.model.stock = config.initial_stock.min(config.stock_capacity);
        }

        // Move to the area center before probing for sensors
        let travel = actor.model.position.distance_to(msg.center);
        actor.model.energy.record_travel(travel);
        actor.model.position = msg.center;

        let correlation_id = "discovery".create_type_id::<V7>().to_string();
        actor.model.assignment = Some((msg.la_id, msg.center));
        actor.model.discovery = Some(correlation_id.clone());
        actor.model.phase = RobotPhase::Discovering;
        actor.model.phase_started = Some(Instant::now());

        // A fresh registry per local phase; late replies from an earlier
        // window are folded in when the policy keeps them.
        let mut registry = SensorRegistry::new();
        if config.accept_late_replies {
            for reply in actor.model.late_replies.drain(..) {
                registry.ingest(
                    reply.sensor_id,
                    reply.position,
                    reply.status,
                    msg.center,
                    config.robot_range,
                );
            }
        }
        actor.model.registry = registry;

        info!(
            robot = actor.model.robot_id,
            la = msg.la_id,
            center = %msg.center,
            stock = actor.model.stock,
            "Assignment accepted, starting discovery"
        );
        actor.model.energy.record_tx();

        let broker = actor.broker().clone();
        let robot_id = actor.model.robot_id;
        let position = msg.center;
        let window_ms = config.discovery_window_ms;

        Reply::pending(async move {
            broker
                .broadcast(DiscoveryRequest {
                    correlation_id: correlation_id.clone(),
                    robot_id,
                    position,
                })
                .await;

            // Bounded reply window; the close message arrives through our
            // own mailbox after all replies received in time.
            tokio::time::sleep(tokio::time::Duration::from_millis(window_ms)).await;
            broker
                .broadcast(DiscoveryWindowClosed {
                    robot_id,
                    correlation_id,
                })
                .await;
        })
    });

    // Handle DiscoveryReply - feed the sensor registry
    actor.mutate_on::<DiscoveryReply>(|actor, context| {
        let msg = context.message().clone();
        if msg.robot_id != actor.model.robot_id {
            return Reply::ready();
        }
        actor.model.energy.record_rx();

        let Some(config) = actor.model.config.as_ref() else {
            return Reply::ready();
        };

        let in_window = actor.model.phase == RobotPhase::Discovering
            && actor.model.discovery.as_deref() == Some(msg.correlation_id.as_str());

        if !in_window {
            if config.accept_late_replies {
                debug!(
                    robot = actor.model.robot_id,
                    sensor = msg.sensor_id,
                    "Late discovery reply kept for the next pass"
                );
                actor.model.late_replies.push(msg);
            } else {
                debug!(
                    robot = actor.model.robot_id,
                    sensor = msg.sensor_id,
                    correlation_id = %msg.correlation_id,
                    "Late discovery reply dropped"
                );
            }
            return Reply::ready();
        }

        let Some((la_id, la_center)) = actor.model.assignment else {
            return Reply::ready();
        };
        let robot_range = config.robot_range;

        match actor.model.registry.ingest(
            msg.sensor_id,
            msg.position,
            msg.status,
            la_center,
            robot_range,
        ) {
            IngestOutcome::Accepted => {
                debug!(
                    robot = actor.model.robot_id,
                    sensor = msg.sensor_id,
                    position = %msg.position,
                    la = la_id,
                    "Discovered sensor"
                );
            }
            IngestOutcome::OutOfArea => {
                // Expected: the probe reaches past the area boundary.
                debug!(
                    robot = actor.model.robot_id,
                    sensor = msg.sensor_id,
                    position = %msg.position,
                    la = la_id,
                    "Sensor outside area bounds, ignored"
                );
            }
            IngestOutcome::Malformed => {
                warn!(
                    robot = actor.model.robot_id,
                    sensor = msg.sensor_id,
                    "Malformed discovery reply dropped"
                );
            }
        }
        Reply::ready()
    });

    // Handle DiscoveryWindowClosed - run the whole dispersion phase
    actor.mutate_on::<DiscoveryWindowClosed>(|actor, context| {
        let msg = context.message();
        if msg.robot_id != actor.model.robot_id {
            return Reply::ready();
        }
        if actor.model.phase != RobotPhase::Discovering
            || actor.model.discovery.as_deref() != Some(msg.correlation_id.as_str())
        {
            debug!(
                robot = actor.model.robot_id,
                correlation_id = %msg.correlation_id,
                "Stale discovery window close, ignoring"
            );
            return Reply::ready();
        }

        let Some(config) = actor.model.config.clone() else {
            return Reply::ready();
        };
        let Some((la_id, la_center)) = actor.model.assignment else {
            return Reply::ready();
        };

        actor.model.phase = RobotPhase::Dispersing;
        info!(
            robot = actor.model.robot_id,
            la = la_id,
            sensors = actor.model.registry.len(),
            "Discovery complete, starting dispersion"
        );

        let mut grids = partition_grids(
            la_center,
            config.robot_range,
            config.sensor_range,
            config.max_grids_per_area,
        );
        let budget = grids.len() as u16;

        let mut registry = std::mem::take(&mut actor.model.registry);
        let mut engine = DispersionEngine::new(
            config.stock_capacity,
            actor.model.stock,
            config.sensor_range / 2.0,
            actor.model.position,
            budget,
        );
        let report = engine.run(&mut grids, &mut registry);

        actor.model.stock = engine.stock();
        actor.model.position = engine.position();
        for visit in &report.visits {
            actor.model.energy.record_travel(visit.travel);
        }

        // Redeploy orders derived from the visit log: fresh units from stock
        // and relocations of discovered sensors.
        let mut commands = Vec::new();
        for visit in &report.visits {
            let Some(grid) = grids.iter().find(|g| g.id == visit.grid_id) else {
                continue;
            };
            if visit.placed_from_stock {
                commands.push(RedeployCommand {
                    sensor_id: None,
                    target: grid.center,
                    from_stock: true,
                });
            }
            if let Some(sensor_id) = visit.relocated {
                commands.push(RedeployCommand {
                    sensor_id: Some(sensor_id),
                    target: grid.center,
                    from_stock: false,
                });
            }
        }

        actor.model.phase = RobotPhase::Reporting;
        let covered = report.covered;
        let percent = if grids.is_empty() {
            0.0
        } else {
            covered as f64 * 100.0 / grids.len() as f64
        };
        info!(
            robot = actor.model.robot_id,
            la = la_id,
            covered = covered,
            grids = grids.len(),
            coverage = format!("{percent:.1}%"),
            moves_used = report.moves_used,
            distance = format!("{:.1}", report.distance),
            stock = actor.model.stock,
            "Local phase complete"
        );

        for _ in &commands {
            actor.model.energy.record_tx();
        }
        for _ in 0..=config.resend_attempts {
            actor.model.energy.record_tx();
        }
        if let Some(started) = actor.model.phase_started.take() {
            actor.model.energy.settle(started.elapsed().as_secs_f64());
        }
        actor.model.areas_completed += 1;
        debug!(
            robot = actor.model.robot_id,
            areas_completed = actor.model.areas_completed,
            energy = ?actor.model.energy.breakdown(),
            "Robot energy after local phase"
        );

        // Reset working state; grids and the registry are per-phase
        actor.model.phase = RobotPhase::Idle;
        actor.model.assignment = None;
        actor.model.discovery = None;
        actor.model.last_completed = Some(la_id);

        let coverage_report = CoverageReport {
            robot_id: actor.model.robot_id,
            la_id,
            covered_grids: covered,
        };
        let broker = actor.broker().clone();
        let resend_attempts = config.resend_attempts;
        let resend_delay_ms = config.resend_delay_ms;

        Reply::pending(async move {
            for command in commands {
                broker.broadcast(command).await;
            }
            // At-least-once effort: the first send plus a bounded number of
            // resends; the base station deduplicates by area id.
            for attempt in 0..=resend_attempts {
                if attempt > 0 {
                    tokio::time::sleep(tokio::time::Duration::from_millis(resend_delay_ms))
                        .await;
                }
                broker.broadcast(coverage_report.clone()).await;
            }
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn robot_spawns_and_shuts_down() {
        let mut runtime = ActonApp::launch_async().await;
        let robot = Robot::new(0, DeploymentConfig::default());
        let _handle = robot.spawn(&mut runtime).await;
        let _ = runtime.shutdown_all().await;
    }
}
