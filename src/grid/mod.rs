//! Spatial grid: cells, blocking, occupancy and distance.
//!
//! The grid answers synchronous queries from movement and targeting code.
//! It holds units only as `UnitId` handles; it never owns them.

pub mod cell;
pub mod model;

pub use cell::GridCell;
pub use model::GridModel;
