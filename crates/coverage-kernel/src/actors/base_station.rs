//! BaseStation: global-phase coordinator for the deployment.
//!
//! Owns the location-area table and drives the robots:
//! 1. On `RobotReady`: hand the robot the first unassigned, unprocessed area
//! 2. On `CoverageReport`: record the area's covered-grid count exactly once,
//!    then hand the robot its next area
//! 3. When every area is processed: compute the final coverage percentage
//!    and send `DeploymentComplete` to the registered driver
//!
//! Assignments are broadcast with bounded resends; report handling is
//! idempotent by area id, so duplicate reports are ignored rather than
//! double-counted.

use std::collections::HashSet;

use acton_reactive::prelude::*;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::config::DeploymentConfig;
use crate::deployment::{AreaOutcome, CoverageSummary};
use crate::energy::{EnergyMeter, EnergyParams};
use crate::grid::{self, AreaId, LocationArea};
use crate::messages::{
    CoverageReport, DeploymentComplete, LaAssignment, RegisterReportDriver, RobotId, RobotReady,
};

/// One location area as the base station tracks it.
#[derive(Debug, Clone)]
struct AreaRecord {
    area: LocationArea,
    /// Set by the first report received for this area; never cleared.
    processed: bool,
    /// Robot currently working this area, if any.
    assigned_to: Option<RobotId>,
}

/// Actor state for the base station.
#[derive(Clone)]
pub struct BaseStationState {
    config: Option<DeploymentConfig>,
    areas: Vec<AreaRecord>,
    grids_per_area: usize,
    /// Active assignment per robot.
    assignments: DashMap<RobotId, AreaId>,
    known_robots: HashSet<RobotId>,
    driver: Option<ActorHandle>,
    energy: EnergyMeter,
    done: bool,
    summary_sent: bool,
    duplicate_reports: usize,
}

impl Default for BaseStationState {
    fn default() -> Self {
        Self {
            config: None,
            areas: Vec::new(),
            grids_per_area: 0,
            assignments: DashMap::new(),
            known_robots: HashSet::new(),
            driver: None,
            energy: EnergyMeter::new(EnergyParams::base_station()),
            done: false,
            summary_sent: false,
            duplicate_reports: 0,
        }
    }
}

impl std::fmt::Debug for BaseStationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseStationState")
            .field("areas", &self.areas.len())
            .field("processed", &self.areas.iter().filter(|a| a.processed).count())
            .field("known_robots", &self.known_robots.len())
            .field("done", &self.done)
            .finish()
    }
}

impl BaseStationState {
    /// First area that is neither processed nor assigned, claimed for the
    /// robot. Returns the assignment to broadcast, or none when every area is
    /// already processed or being worked.
    fn assign_next(&mut self, robot_id: RobotId) -> Option<LaAssignment> {
        let record = self
            .areas
            .iter_mut()
            .find(|r| !r.processed && r.assigned_to.is_none())?;
        record.assigned_to = Some(robot_id);
        self.assignments.insert(robot_id, record.area.id);
        Some(LaAssignment {
            robot_id,
            la_id: record.area.id,
            center: record.area.center,
        })
    }

    fn all_processed(&self) -> bool {
        self.areas.iter().all(|r| r.processed)
    }

    /// Final coverage figures. The denominator is guarded: a degenerate
    /// partition reports zero percent instead of dividing by zero.
    fn summary(&self) -> CoverageSummary {
        let covered_grids: u32 = self
            .areas
            .iter()
            .map(|r| u32::from(r.area.covered_grids))
            .sum();
        let total_grids = (self.areas.len() * self.grids_per_area) as u32;
        let coverage_percent = if total_grids == 0 {
            0.0
        } else {
            covered_grids as f64 * 100.0 / total_grids as f64
        };
        CoverageSummary {
            total_areas: self.areas.len(),
            grids_per_area: self.grids_per_area,
            covered_grids,
            total_grids,
            coverage_percent,
            areas: self
                .areas
                .iter()
                .map(|r| AreaOutcome {
                    la_id: r.area.id,
                    covered_grids: r.area.covered_grids,
                })
                .collect(),
        }
    }
}

/// The base station actor.
///
/// Partitions the target area into location areas at spawn and then reacts
/// to robot traffic until every area is processed.
pub struct BaseStation {
    pub config: DeploymentConfig,
}

impl BaseStation {
    /// Create a new base station.
    pub fn new(config: DeploymentConfig) -> Self {
        Self { config }
    }

    /// Spawn the base station in the given runtime.
    pub async fn spawn(self, runtime: &mut ActorRuntime) -> ActorHandle {
        let mut actor =
            runtime.new_actor_with_name::<BaseStationState>("BaseStation".to_string());

        let areas = grid::partition_areas(
            self.config.area_size,
            self.config.robot_range,
            self.config.max_location_areas,
        );
        info!(
            areas = areas.len(),
            area_size = self.config.area_size,
            robot_range = self.config.robot_range,
            "Base station initialized location areas"
        );

        actor.model.grids_per_area = grid::grids_per_area(
            self.config.robot_range,
            self.config.sensor_range,
            self.config.max_grids_per_area,
        );
        actor.model.areas = areas
            .into_iter()
            .map(|area| AreaRecord {
                area,
                processed: false,
                assigned_to: None,
            })
            .collect();
        // Nothing to deploy into: complete as soon as a driver registers.
        actor.model.done = actor.model.areas.is_empty();
        actor.model.energy = EnergyMeter::new(self.config.base_energy.clone());
        actor.model.config = Some(self.config);

        // Subscribe to robot broadcasts BEFORE starting
        actor.handle().subscribe::<RobotReady>().await;
        actor.handle().subscribe::<CoverageReport>().await;

        configure_handlers(&mut actor);

        actor.start().await
    }
}

/// Configure all message handlers for the base station.
fn configure_handlers(actor: &mut ManagedActor<Idle, BaseStationState>) {
    // Handle robot self-registration
    actor.mutate_on::<RobotReady>(|actor, context| {
        let robot_id = context.message().robot_id;
        actor.model.energy.record_rx();
        actor.model.known_robots.insert(robot_id);
        debug!(
            robot = robot_id,
            total_robots = actor.model.known_robots.len(),
            "Robot registered"
        );

        if actor.model.done {
            return Reply::ready();
        }
        let Some(config) = actor.model.config.as_ref() else {
            warn!("BaseStation: config not initialized");
            return Reply::ready();
        };
        let resend_attempts = config.resend_attempts;
        let resend_delay_ms = config.resend_delay_ms;

        let Some(assignment) = actor.model.assign_next(robot_id) else {
            debug!(robot = robot_id, "No assignable area, robot stays idle");
            return Reply::ready();
        };
        info!(
            robot = robot_id,
            la = assignment.la_id,
            center = %assignment.center,
            "Assigned robot to location area"
        );
        for _ in 0..=resend_attempts {
            actor.model.energy.record_tx();
        }

        let broker = actor.broker().clone();
        Reply::pending(async move {
            // At-least-once effort: first send plus bounded resends; robots
            // ignore duplicates.
            for attempt in 0..=resend_attempts {
                if attempt > 0 {
                    tokio::time::sleep(tokio::time::Duration::from_millis(resend_delay_ms))
                        .await;
                }
                broker.broadcast(assignment.clone()).await;
            }
        })
    });

    // Handle coverage reports - idempotent by area id
    actor.mutate_on::<CoverageReport>(|actor, context| {
        let msg = context.message().clone();
        actor.model.energy.record_rx();
        actor.model.energy.record_processing();

        let Some(config) = actor.model.config.as_ref() else {
            return Reply::ready();
        };
        let resend_attempts = config.resend_attempts;
        let resend_delay_ms = config.resend_delay_ms;
        let grids_per_area = actor.model.grids_per_area;

        let Some(record) = actor
            .model
            .areas
            .iter_mut()
            .find(|r| r.area.id == msg.la_id)
        else {
            warn!(
                robot = msg.robot_id,
                la = msg.la_id,
                "Coverage report for unknown area, dropped"
            );
            return Reply::ready();
        };

        if record.processed {
            // Expected under at-least-once reporting; count and move on.
            actor.model.duplicate_reports += 1;
            debug!(
                robot = msg.robot_id,
                la = msg.la_id,
                "Duplicate coverage report ignored"
            );
            return Reply::ready();
        }

        let assigned = actor
            .model
            .assignments
            .get(&msg.robot_id)
            .map(|entry| *entry.value());
        if assigned != Some(msg.la_id) {
            warn!(
                robot = msg.robot_id,
                la = msg.la_id,
                assigned = ?assigned,
                "Report does not match the robot's assignment"
            );
        }

        // covered_grids is written exactly once per area, here.
        record.processed = true;
        record.area.covered_grids = msg.covered_grids;
        record.assigned_to = None;
        actor.model.assignments.remove(&msg.robot_id);

        let percent = if grids_per_area == 0 {
            0.0
        } else {
            f64::from(msg.covered_grids) * 100.0 / grids_per_area as f64
        };
        info!(
            robot = msg.robot_id,
            la = msg.la_id,
            covered = msg.covered_grids,
            grids = grids_per_area,
            coverage = format!("{percent:.1}%"),
            "Coverage report accepted"
        );

        if actor.model.all_processed() {
            actor.model.done = true;
            let summary = actor.model.summary();
            info!(
                areas = summary.total_areas,
                covered = summary.covered_grids,
                total = summary.total_grids,
                coverage = format!("{:.2}%", summary.coverage_percent),
                duplicates_ignored = actor.model.duplicate_reports,
                "All location areas processed, deployment complete"
            );
            debug!(
                energy = ?actor.model.energy.breakdown(),
                "Base station energy at completion"
            );

            if actor.model.summary_sent {
                return Reply::ready();
            }
            let Some(driver) = actor.model.driver.clone() else {
                // Driver not registered yet; it gets the summary on
                // registration.
                return Reply::ready();
            };
            actor.model.summary_sent = true;
            return Reply::pending(async move {
                driver.send(DeploymentComplete { summary }).await;
            });
        }

        // Keep this robot busy with the next open area
        let Some(assignment) = actor.model.assign_next(msg.robot_id) else {
            debug!(
                robot = msg.robot_id,
                "Remaining areas are all being worked, robot stays idle"
            );
            return Reply::ready();
        };
        info!(
            robot = msg.robot_id,
            la = assignment.la_id,
            "Assigned robot to next location area"
        );
        for _ in 0..=resend_attempts {
            actor.model.energy.record_tx();
        }

        let broker = actor.broker().clone();
        Reply::pending(async move {
            for attempt in 0..=resend_attempts {
                if attempt > 0 {
                    tokio::time::sleep(tokio::time::Duration::from_millis(resend_delay_ms))
                        .await;
                }
                broker.broadcast(assignment.clone()).await;
            }
        })
    });

    // Handle driver registration
    actor.mutate_on::<RegisterReportDriver>(|actor, context| {
        let handle = context.message().handle.clone();
        actor.model.driver = Some(handle.clone());
        debug!("Registered report driver");

        // Completion may have preceded registration (degenerate partitions
        // finish instantly).
        if actor.model.done && !actor.model.summary_sent {
            actor.model.summary_sent = true;
            let summary = actor.model.summary();
            return Reply::pending(async move {
                handle.send(DeploymentComplete { summary }).await;
            });
        }
        Reply::ready()
    });
}
