//! Robot-local sensor database built from discovery replies.
//!
//! Each local phase starts with an empty registry. Replies are filtered at
//! ingestion (perception range and location-area bounds), duplicates
//! overwrite by sensor id, and iteration order is always ascending id so the
//! dispersion procedure stays deterministic regardless of reply arrival
//! order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spatial::{self, Point};

/// Identifier of a sensor node.
pub type SensorId = u16;

/// Operating mode of a discovered sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    /// Randomly deployed, not yet serving a grid.
    Idle,
    /// Placed at a grid center and sensing.
    Active,
}

/// One discovered sensor as the robot knows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub id: SensorId,
    pub position: Point,
    pub status: SensorStatus,
}

/// Outcome of offering a discovery reply to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Reply accepted; a record was inserted or overwritten.
    Accepted,
    /// Sensor lies outside the robot's perception range or the location-area
    /// bounds. Expected during discovery, dropped without a record.
    OutOfArea,
    /// Reply failed validation (non-finite coordinates). Dropped.
    Malformed,
}

/// Local database of discovered sensors, keyed by sensor id.
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    records: BTreeMap<SensorId, SensorRecord>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: SensorId) -> Option<&SensorRecord> {
        self.records.get(&id)
    }

    /// Offer a discovery reply to the registry.
    ///
    /// Accepts the sensor only when it is within `robot_range` of the
    /// location-area center and inside the area's square bounds. A reply for
    /// an already-known sensor id overwrites the earlier record
    /// (last-writer-wins), so reply ordering within the discovery window does
    /// not matter.
    pub fn ingest(
        &mut self,
        id: SensorId,
        position: Point,
        status: SensorStatus,
        la_center: Point,
        robot_range: f64,
    ) -> IngestOutcome {
        if !position.is_finite() {
            return IngestOutcome::Malformed;
        }
        let in_range = la_center.distance_to(position) <= robot_range;
        let in_bounds = position.in_square(la_center, robot_range / 2.0);
        if !in_range || !in_bounds {
            return IngestOutcome::OutOfArea;
        }
        self.records.insert(id, SensorRecord { id, position, status });
        IngestOutcome::Accepted
    }

    /// Idle sensors inside the square cell of the given half-width around a
    /// grid center, in ascending id order.
    pub fn idle_in_cell(&self, cell_center: Point, half_width: f64) -> Vec<SensorId> {
        self.records
            .values()
            .filter(|r| r.status == SensorStatus::Idle)
            .filter(|r| r.position.in_square(cell_center, half_width))
            .map(|r| r.id)
            .collect()
    }

    /// Of the given sensors, the one closest to `target` (ties: lowest id).
    pub fn nearest_of(&self, ids: &[SensorId], target: Point) -> Option<SensorId> {
        spatial::nearest(
            ids.iter().filter_map(|id| self.records.get(id)),
            |r| r.position.distance_to(target),
            |r| u32::from(r.id),
        )
        .map(|r| r.id)
    }

    /// Move a sensor to a new position and mark it active.
    pub fn relocate(&mut self, id: SensorId, to: Point) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.position = to;
                record.status = SensorStatus::Active;
                true
            }
            None => false,
        }
    }

    /// Remove a sensor from the working set (absorbed into robot stock).
    ///
    /// Stock sensors are fungible; once collected, only the robot's stock
    /// count remembers them.
    pub fn collect(&mut self, id: SensorId) -> bool {
        self.records.remove(&id).is_some()
    }

    /// Count of sensors still idle in the working set.
    pub fn idle_count(&self) -> usize {
        self.records
            .values()
            .filter(|r| r.status == SensorStatus::Idle)
            .count()
    }
}
