//! Planar points and grid cell keys.

use serde::{Deserialize, Serialize};

// == Point ==
/// A position on the horizontal x/z plane.
///
/// Altitude never takes part in grid math, so it is not carried.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    /// Squared planar distance, compared against squared radii to avoid `sqrt`.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, z): (f64, f64)) -> Self {
        Self { x, z }
    }
}

// == Cell Key ==
/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellKey {
    pub col: i64,
    pub row: i64,
}

impl CellKey {
    /// Cell containing `point`; boundaries belong to the cell on their positive side.
    pub fn containing(point: &Point, cell_size: f64) -> Self {
        Self {
            col: (point.x / cell_size).floor() as i64,
            row: (point.z / cell_size).floor() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_floor_division() {
        assert_eq!(CellKey::containing(&Point::new(0.0, 0.0), 2000.0), CellKey { col: 0, row: 0 });
        assert_eq!(CellKey::containing(&Point::new(1999.9, 10.0), 2000.0), CellKey { col: 0, row: 0 });
        assert_eq!(CellKey::containing(&Point::new(2000.0, 4000.0), 2000.0), CellKey { col: 1, row: 2 });
        assert_eq!(CellKey::containing(&Point::new(-0.5, -2000.0), 2000.0), CellKey { col: -1, row: -1 });
        assert_eq!(CellKey::containing(&Point::new(-2000.1, 0.0), 2000.0), CellKey { col: -2, row: 0 });
    }

    #[test]
    fn test_planar_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);

        assert_eq!(a.distance_squared(&b), 25.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_point_finite() {
        assert!(Point::new(1.0, -1.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}
