//! Grid model: cell storage, occupancy and distance queries.
//!
//! The `GridModel` owns a fixed `width * height` array of cells stored flat
//! (`index = y * width + x`). Queries never panic: out-of-range lookups
//! return `None`, out-of-range mutations are ignored, and out-of-range
//! positions count as blocked so movement and targeting code does not need
//! its own bounds check.
//!
//! ## Usage
//!
//! ```
//! use grid_tactics::grid::GridModel;
//! use grid_tactics::core::GridPosition;
//!
//! let mut grid = GridModel::new(10, 10).unwrap();
//! grid.set_blocked(4, 4, true);
//!
//! assert!(grid.is_blocked(GridPosition::planar(4, 4)));
//! assert!(grid.is_blocked(GridPosition::planar(-1, 0)));
//! assert_eq!(grid.distance(GridPosition::planar(0, 0), GridPosition::planar(3, 1)), 3);
//! ```

use smallvec::SmallVec;

use crate::core::{GridConfig, GridPosition, Result, TacticsError, UnitId};

use super::cell::GridCell;

/// Fixed-size tactical grid.
#[derive(Clone, Debug)]
pub struct GridModel {
    width: i32,
    height: i32,
    cell_size: f32,
    elevation_height: f32,
    cells: Vec<GridCell>,
}

impl GridModel {
    /// Create a grid of open, ground-level cells with unit scale.
    ///
    /// Non-positive dimensions, and grids with more cells than an `i32`
    /// can index, are rejected.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::from_config(&GridConfig::new(width, height))
    }

    /// Create a grid from a config, including its world-space scale.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let (width, height) = (config.width, config.height);
        if width <= 0 || height <= 0 {
            return Err(TacticsError::InvalidGridDimensions { width, height });
        }

        let count = width
            .checked_mul(height)
            .ok_or(TacticsError::GridTooLarge { width, height })?;

        let mut cells = Vec::with_capacity(count as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(GridCell::new(GridPosition::planar(x, y)));
            }
        }

        tracing::debug!(width, height, cells = cells.len(), "grid created");

        Ok(Self {
            width,
            height,
            cell_size: config.cell_size,
            elevation_height: config.elevation_height,
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells (`width * height`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    // === Lookup ===

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid(x, y).then(|| (y * self.width + x) as usize)
    }

    /// Bounds check on planar coordinates.
    #[must_use]
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Bounds check on a position; elevation is not considered.
    #[must_use]
    pub fn is_valid_position(&self, pos: GridPosition) -> bool {
        self.is_valid(pos.x, pos.y)
    }

    /// Get the cell at `(x, y)`, or `None` if out of range.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<&GridCell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get the cell at `pos` (elevation ignored).
    #[must_use]
    pub fn cell_at(&self, pos: GridPosition) -> Option<&GridCell> {
        self.cell(pos.x, pos.y)
    }

    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut GridCell> {
        let i = self.index(x, y)?;
        Some(&mut self.cells[i])
    }

    pub fn cell_at_mut(&mut self, pos: GridPosition) -> Option<&mut GridCell> {
        self.cell_mut(pos.x, pos.y)
    }

    /// Out of bounds, blocked terrain, or occupied.
    #[must_use]
    pub fn is_blocked(&self, pos: GridPosition) -> bool {
        self.cell_at(pos).map_or(true, GridCell::is_impassable)
    }

    /// The unit standing at `pos`, if any.
    #[must_use]
    pub fn occupant(&self, pos: GridPosition) -> Option<UnitId> {
        self.cell_at(pos).and_then(|cell| cell.occupant)
    }

    /// Find the cell a unit occupies.
    #[must_use]
    pub fn find_occupant(&self, unit: UnitId) -> Option<GridPosition> {
        self.cells
            .iter()
            .find(|cell| cell.occupant == Some(unit))
            .map(|cell| cell.position)
    }

    /// In-bounds cells adjacent to `pos`, diagonals included.
    ///
    /// Returned positions carry each neighbor's current elevation.
    #[must_use]
    pub fn neighbors(&self, pos: GridPosition) -> SmallVec<[GridPosition; 8]> {
        let mut out = SmallVec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (Some(x), Some(y)) = (pos.x.checked_add(dx), pos.y.checked_add(dy)) else {
                    continue;
                };
                if let Some(cell) = self.cell(x, y) {
                    out.push(cell.position);
                }
            }
        }
        out
    }

    // === Mutation ===
    //
    // Invalid coordinates are ignored; callers need not pre-validate.

    /// Set a cell's elevation level (and its position's z).
    pub fn set_elevation(&mut self, x: i32, y: i32, elevation: i32) {
        match self.cell_mut(x, y) {
            Some(cell) => cell.set_elevation(elevation),
            None => tracing::debug!(x, y, elevation, "set_elevation ignored: out of bounds"),
        }
    }

    /// Mark a cell as blocked or open terrain.
    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        match self.cell_mut(x, y) {
            Some(cell) => cell.blocked = blocked,
            None => tracing::debug!(x, y, blocked, "set_blocked ignored: out of bounds"),
        }
    }

    /// Put a unit on a cell, replacing any previous occupant.
    pub fn set_occupant(&mut self, pos: GridPosition, unit: UnitId) {
        match self.cell_at_mut(pos) {
            Some(cell) => cell.occupant = Some(unit),
            None => tracing::debug!(%pos, %unit, "set_occupant ignored: out of bounds"),
        }
    }

    /// Remove whatever unit is on a cell.
    pub fn clear_occupant(&mut self, pos: GridPosition) {
        match self.cell_at_mut(pos) {
            Some(cell) => cell.occupant = None,
            None => tracing::debug!(%pos, "clear_occupant ignored: out of bounds"),
        }
    }

    // === Geometry ===

    /// Distance in cells: each diagonal step and each straight step costs 1.
    ///
    /// This is a plain cell count, not the alternating 1-2-1 diagonal
    /// rule; elevation is not included. Saturates at `i32::MAX` for
    /// positions further apart than that.
    #[must_use]
    pub fn distance(&self, a: GridPosition, b: GridPosition) -> i32 {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);

        let diagonal = dx.min(dy);
        let straight = dx.abs_diff(dy);

        i32::try_from(diagonal + straight).unwrap_or(i32::MAX)
    }

    /// Signed elevation change going from `a` to `b`.
    #[must_use]
    pub fn elevation_difference(&self, a: GridPosition, b: GridPosition) -> i32 {
        b.z.saturating_sub(a.z)
    }

    // === World space ===

    /// World-space origin corner of a cell.
    #[must_use]
    pub fn cell_to_world(&self, pos: GridPosition) -> [f32; 3] {
        [
            pos.x as f32 * self.cell_size,
            pos.y as f32 * self.cell_size,
            pos.z as f32 * self.elevation_height,
        ]
    }

    /// Cell containing a world-space point, at that cell's elevation.
    ///
    /// Returns `None` outside the grid or for non-finite input. The point's
    /// height is ignored.
    #[must_use]
    pub fn world_to_cell(&self, world: [f32; 3]) -> Option<GridPosition> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return None;
        }
        if !world[0].is_finite() || !world[1].is_finite() {
            return None;
        }
        let x = (world[0] / self.cell_size).floor() as i32;
        let y = (world[1] / self.cell_size).floor() as i32;
        self.cell(x, y).map(|cell| cell.position)
    }
}
