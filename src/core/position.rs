//! Grid coordinates.
//!
//! A `GridPosition` is a planar cell coordinate plus a discrete elevation
//! level. Positions compare by value only; there is deliberately no ordering.
//!
//! ```
//! use grid_tactics::core::GridPosition;
//!
//! let ground = GridPosition::new(3, 4, 0);
//! let ledge = ground.with_z(2);
//!
//! assert_ne!(ground, ledge);
//! assert!(ground.same_column(ledge));
//! ```

use serde::{Deserialize, Serialize};

/// Cell coordinate: `x`, `y` on the grid plane, `z` the elevation level
/// (0 = ground, 1 = one tier up, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPosition {
    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Create a ground-level position.
    #[must_use]
    pub const fn planar(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Same planar cell at a different elevation level.
    #[must_use]
    pub const fn with_z(self, z: i32) -> Self {
        Self { x: self.x, y: self.y, z }
    }

    /// Offset on the plane, keeping elevation.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// True if both positions address the same planar cell.
    #[must_use]
    pub const fn same_column(self, other: GridPosition) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<(i32, i32)> for GridPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self::planar(x, y)
    }
}

impl From<(i32, i32, i32)> for GridPosition {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_origin() {
        assert_eq!(GridPosition::default(), GridPosition::new(0, 0, 0));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(GridPosition::new(1, 2, 3), GridPosition::new(1, 2, 3));
        assert_ne!(GridPosition::new(1, 2, 3), GridPosition::new(1, 2, 0));
    }

    #[test]
    fn test_offset_keeps_elevation() {
        let pos = GridPosition::new(5, 5, 2).offset(-1, 1);
        assert_eq!(pos, GridPosition::new(4, 6, 2));
    }

    #[test]
    fn test_from_tuples() {
        assert_eq!(GridPosition::from((2, 3)), GridPosition::new(2, 3, 0));
        assert_eq!(GridPosition::from((2, 3, 1)), GridPosition::new(2, 3, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", GridPosition::new(7, -1, 2)), "(7, -1, 2)");
    }

    #[test]
    fn test_serialization() {
        let pos = GridPosition::new(4, 9, 1);
        let json = serde_json::to_string(&pos).unwrap();
        let deserialized: GridPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, deserialized);
    }
}
