//! A single grid cell.

use serde::{Deserialize, Serialize};

use crate::core::{GridPosition, UnitId};

/// One cell: where it is, how high it is, whether it blocks, and who stands
/// on it.
///
/// `elevation` always equals `position.z`; the grid keeps them in sync.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub position: GridPosition,
    pub elevation: i32,
    pub blocked: bool,
    /// Non-owning handle to the unit on this cell.
    pub occupant: Option<UnitId>,
}

impl GridCell {
    /// Create an open, unoccupied cell at `position`.
    #[must_use]
    pub fn new(position: GridPosition) -> Self {
        Self {
            position,
            elevation: position.z,
            blocked: false,
            occupant: None,
        }
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Blocked terrain or an occupant.
    #[must_use]
    pub fn is_impassable(&self) -> bool {
        self.blocked || self.is_occupied()
    }

    pub(crate) fn set_elevation(&mut self, elevation: i32) {
        self.elevation = elevation;
        self.position.z = elevation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_open() {
        let cell = GridCell::new(GridPosition::new(2, 3, 1));
        assert_eq!(cell.elevation, 1);
        assert!(!cell.blocked);
        assert!(!cell.is_occupied());
        assert!(!cell.is_impassable());
    }

    #[test]
    fn test_elevation_tracks_position() {
        let mut cell = GridCell::new(GridPosition::planar(0, 0));
        cell.set_elevation(4);
        assert_eq!(cell.elevation, 4);
        assert_eq!(cell.position, GridPosition::new(0, 0, 4));
    }
}
