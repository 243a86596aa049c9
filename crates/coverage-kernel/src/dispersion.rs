//! The per-grid sensor redistribution procedure.
//!
//! A robot works through its grids one at a time until the movement budget is
//! spent or no uncovered grid remains. Every visit applies exactly one of
//! four actions, chosen by whether the robot carries stock and whether the
//! grid already holds idle sensors. The whole procedure is pure with respect
//! to the outside world: message sends and energy accounting are derived by
//! the caller from the returned visit log.

use serde::Serialize;

use crate::grid::{Grid, GridId};
use crate::registry::{SensorId, SensorRegistry};
use crate::spatial::{self, Point};

/// The action applied to a grid, keyed by (stock > 0, sensors in grid > 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAction {
    /// Stock available and the grid holds idle sensors: place one sensor from
    /// stock at the grid center, then absorb the grid's idle sensors into
    /// stock up to capacity.
    PlaceAndCollect,
    /// Stock available, empty grid: place one sensor from stock at the grid
    /// center.
    PlaceFromStock,
    /// No stock, grid holds idle sensors: relocate the sensor nearest to the
    /// grid center onto it, then absorb the remaining idle sensors up to
    /// capacity.
    RelocateNearest,
    /// No stock, empty grid: nothing to place, the grid stays uncovered.
    LeaveUncovered,
}

/// What happened during a single grid visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridVisit {
    pub grid_id: GridId,
    pub action: GridAction,
    /// Distance traveled to reach this grid's center.
    pub travel: f64,
    /// Set when a fresh sensor was deployed from stock at the grid center.
    pub placed_from_stock: bool,
    /// Set when an existing sensor was relocated to the grid center.
    pub relocated: Option<SensorId>,
    /// Sensors absorbed into stock during this visit, ascending id.
    pub collected: Vec<SensorId>,
}

/// Summary of one dispersion run over a grid set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispersionReport {
    pub visits: Vec<GridVisit>,
    /// Grids covered during this run.
    pub covered: u16,
    /// Total distance traveled across all visits.
    pub distance: f64,
    /// Movement budget consumed (one unit per visit).
    pub moves_used: u16,
    /// Stock on hand after the run.
    pub stock_remaining: u8,
}

/// Budget-constrained redistribution over the grids of one location area.
///
/// Owns the robot-local dispersion state: current position, sensor stock and
/// the remaining movement budget. Grid and sensor state live in the caller's
/// [`Grid`] slice and [`SensorRegistry`], which the engine mutates in place.
#[derive(Debug, Clone)]
pub struct DispersionEngine {
    capacity: u8,
    cell_half_width: f64,
    position: Point,
    stock: u8,
    moves_remaining: u16,
}

impl DispersionEngine {
    /// Set up a run starting at `position` (normally the location-area
    /// center) with a movement budget of `moves` grid visits.
    ///
    /// `stock` is clamped to `capacity`; the stock invariant
    /// `0 <= stock <= capacity` holds throughout the run.
    pub fn new(capacity: u8, stock: u8, cell_half_width: f64, position: Point, moves: u16) -> Self {
        Self {
            capacity,
            cell_half_width,
            position,
            stock: stock.min(capacity),
            moves_remaining: moves,
        }
    }

    pub fn stock(&self) -> u8 {
        self.stock
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn moves_remaining(&self) -> u16 {
        self.moves_remaining
    }

    /// Run dispersion to completion: repeat grid visits until the movement
    /// budget is exhausted or no uncovered grid remains.
    ///
    /// An unserviceable grid (no stock, no sensors) stays uncovered and may
    /// be selected again; the budget guarantees termination.
    pub fn run(&mut self, grids: &mut [Grid], registry: &mut SensorRegistry) -> DispersionReport {
        let budget = self.moves_remaining;
        let mut report = DispersionReport::default();

        while self.moves_remaining > 0 {
            let Some(target) = self.next_target(grids) else {
                break;
            };
            let visit = self.visit(&mut grids[target], registry);
            report.distance += visit.travel;
            if grids[target].covered && visit.action != GridAction::LeaveUncovered {
                report.covered += 1;
            }
            report.visits.push(visit);
        }

        report.moves_used = budget - self.moves_remaining;
        report.stock_remaining = self.stock;
        report
    }

    /// Nearest uncovered grid to the current position (ties: lowest grid id).
    fn next_target(&self, grids: &[Grid]) -> Option<usize> {
        spatial::nearest(
            grids.iter().enumerate().filter(|(_, g)| !g.covered),
            |(_, g)| self.position.distance_to(g.center),
            |(_, g)| u32::from(g.id),
        )
        .map(|(idx, _)| idx)
    }

    /// Move to a grid and apply the action selected by the
    /// (stock, sensors-present) pair. Consumes one unit of movement budget
    /// regardless of the action.
    fn visit(&mut self, grid: &mut Grid, registry: &mut SensorRegistry) -> GridVisit {
        let travel = self.position.distance_to(grid.center);
        self.position = grid.center;
        self.moves_remaining -= 1;

        let in_cell = registry.idle_in_cell(grid.center, self.cell_half_width);

        let mut visit = GridVisit {
            grid_id: grid.id,
            action: GridAction::LeaveUncovered,
            travel,
            placed_from_stock: false,
            relocated: None,
            collected: Vec::new(),
        };

        match (self.stock > 0, !in_cell.is_empty()) {
            (true, true) => {
                visit.action = GridAction::PlaceAndCollect;
                self.stock -= 1;
                visit.placed_from_stock = true;
                grid.covered = true;
                self.absorb(&in_cell, None, registry, &mut visit);
            }
            (true, false) => {
                visit.action = GridAction::PlaceFromStock;
                self.stock -= 1;
                visit.placed_from_stock = true;
                grid.covered = true;
            }
            (false, true) => {
                visit.action = GridAction::RelocateNearest;
                // in_cell is non-empty, so a nearest sensor always exists.
                if let Some(chosen) = registry.nearest_of(&in_cell, grid.center) {
                    registry.relocate(chosen, grid.center);
                    visit.relocated = Some(chosen);
                    grid.covered = true;
                    self.absorb(&in_cell, Some(chosen), registry, &mut visit);
                }
            }
            (false, false) => {}
        }

        visit
    }

    /// Absorb idle sensors from the cell into stock, ascending id, stopping
    /// at capacity. Sensors left over stay idle in place.
    fn absorb(
        &mut self,
        in_cell: &[SensorId],
        skip: Option<SensorId>,
        registry: &mut SensorRegistry,
        visit: &mut GridVisit,
    ) {
        for &id in in_cell {
            if Some(id) == skip {
                continue;
            }
            if self.stock >= self.capacity {
                break;
            }
            if registry.collect(id) {
                self.stock += 1;
                visit.collected.push(id);
            }
        }
    }
}
