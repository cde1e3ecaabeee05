//! Error type for the few operations that can actually fail.
//!
//! Most of the engine is total: bad coordinates and overspent actions are
//! logged and ignored. Errors are reserved for construction, configuration
//! parsing, session-level commands and features that are not supported yet.

use thiserror::Error;

use super::position::GridPosition;
use super::unit::UnitId;

/// Errors surfaced by grid construction, configuration and session commands.
#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGridDimensions { width: i32, height: i32 },

    #[error("grid {width}x{height} has too many cells to index")]
    GridTooLarge { width: i32, height: i32 },

    #[error("position {0} is outside the grid")]
    InvalidPosition(GridPosition),

    #[error("cell {0} is blocked or occupied")]
    CellBlocked(GridPosition),

    #[error("unit {0} is not registered")]
    UnknownUnit(UnitId),

    #[error("no combat is active")]
    NotInCombat,

    #[error("the current turn has already ended")]
    TurnEnded,

    #[error("not enough actions: need {needed}, have {remaining}")]
    InsufficientActions { needed: u8, remaining: u8 },

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
