//! Location areas and grids: the two tiling granularities of the target area.
//!
//! The base station tiles the whole target area into location areas sized by
//! the robot perception range; each robot tiles its assigned location area
//! into grids sized by the sensor perception range. Both tilings share the
//! same deterministic row-major layout with centers at cell midpoints.

use serde::{Deserialize, Serialize};

use crate::spatial::Point;

/// Identifier of a grid within a location area. Sequential from 1, row-major.
pub type GridId = u16;

/// Identifier of a location area. Sequential from 1, row-major.
pub type AreaId = u16;

/// A micro-cell within a location area, the unit of coverage.
///
/// Grids are created fresh for each local phase and discarded afterwards.
/// `covered` transitions false -> true at most once within a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub id: GridId,
    pub center: Point,
    pub covered: bool,
}

/// A macro-region of the target area, assigned by the base station to one
/// robot at a time.
///
/// `covered_grids` starts at 0 and is written exactly once, when the base
/// station accepts the coverage report for this area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationArea {
    pub id: AreaId,
    pub center: Point,
    pub covered_grids: u16,
}

/// Cells per side for a square tiling of `span` into cells of size `cell`,
/// shrunk so the total cell count never exceeds `max_cells`.
fn side_count(span: f64, cell: f64, max_cells: usize) -> usize {
    if !(span > 0.0) || !(cell > 0.0) || span < cell {
        return 0;
    }
    let mut side = (span / cell).floor() as usize;
    let max_side = (max_cells as f64).sqrt().floor() as usize;
    if side > max_side {
        side = max_side;
    }
    side
}

/// Number of grids a robot lays out per location area for the given ranges.
pub fn grids_per_area(robot_range: f64, sensor_range: f64, max_grids: usize) -> usize {
    let side = side_count(robot_range, sensor_range, max_grids);
    side * side
}

/// Tile a square of side `robot_range` centered on the location-area center
/// into grids of side `sensor_range`.
///
/// Layout is row-major with ascending ids starting at 1; each grid center
/// sits at its cell midpoint. Same inputs always produce the same ordered
/// list. Returns an empty list when `robot_range < sensor_range` (degenerate
/// configuration, zero grids).
pub fn partition_grids(
    la_center: Point,
    robot_range: f64,
    sensor_range: f64,
    max_grids: usize,
) -> Vec<Grid> {
    let side = side_count(robot_range, sensor_range, max_grids);
    let start_x = la_center.x - robot_range / 2.0;
    let start_y = la_center.y - robot_range / 2.0;

    let mut grids = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let id = (row * side + col + 1) as GridId;
            grids.push(Grid {
                id,
                center: Point::new(
                    start_x + col as f64 * sensor_range + sensor_range / 2.0,
                    start_y + row as f64 * sensor_range + sensor_range / 2.0,
                ),
                covered: false,
            });
        }
    }
    grids
}

/// Tile the square target area into location areas of side `robot_range`.
///
/// Same layout rules as [`partition_grids`], at the coarser granularity.
pub fn partition_areas(area_size: f64, robot_range: f64, max_areas: usize) -> Vec<LocationArea> {
    let side = side_count(area_size, robot_range, max_areas);

    let mut areas = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let id = (row * side + col + 1) as AreaId;
            areas.push(LocationArea {
                id,
                center: Point::new(
                    col as f64 * robot_range + robot_range / 2.0,
                    row as f64 * robot_range + robot_range / 2.0,
                ),
                covered_grids: 0,
            });
        }
    }
    areas
}
