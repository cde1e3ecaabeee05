//! Core types: positions, units, the unit registry, RNG, configuration and
//! errors.
//!
//! Everything here is shared by the grid and the turn engine and knows
//! nothing about either.

pub mod position;
pub mod unit;
pub mod registry;
pub mod rng;
pub mod config;
pub mod error;

pub use position::GridPosition;
pub use unit::{Ability, AbilityScores, Saves, UnitCombatState, UnitId};
pub use registry::UnitRegistry;
pub use rng::{GameRng, GameRngState};
pub use config::{EncounterConfig, GridConfig};
pub use error::{Result, TacticsError};
