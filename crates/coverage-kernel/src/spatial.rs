//! 2D geometry over the target area.
//!
//! All node positions, location-area centers and grid centers are plain
//! Euclidean points in meters. Distance and containment checks here are the
//! only spatial primitives the rest of the crate uses.

use serde::{Deserialize, Serialize};

/// A position in the target area, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether this point lies inside the axis-aligned square of the given
    /// half-side centered at `center` (boundary inclusive).
    pub fn in_square(&self, center: Point, half_side: f64) -> bool {
        (self.x - center.x).abs() <= half_side && (self.y - center.y).abs() <= half_side
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Select the item with minimum distance, breaking ties by lowest id.
///
/// Both the next-grid selection and the nearest-sensor selection need a total
/// order even when two candidates are equidistant, so the numeric id is the
/// secondary key.
pub fn nearest<T, D, I>(items: impl IntoIterator<Item = T>, distance: D, id: I) -> Option<T>
where
    D: Fn(&T) -> f64,
    I: Fn(&T) -> u32,
{
    items.into_iter().min_by(|a, b| {
        distance(a)
            .total_cmp(&distance(b))
            .then_with(|| id(a).cmp(&id(b)))
    })
}
