//! # grid-tactics
//!
//! Core of a turn-based tactical combat simulation.
//!
//! ## Design Principles
//!
//! 1. **Handles, not references**: units live in an explicit `UnitRegistry`
//!    and everything else (grid occupancy, initiative entries, the current
//!    turn) holds generation-checked `UnitId`s.
//!
//! 2. **Tagged state**: combat is `Idle` or `Active { round, order, turn }`,
//!    so a turn index outside of combat cannot exist.
//!
//! 3. **Deterministic**: every die roll comes from a seeded ChaCha8 stream,
//!    so an encounter replays from its seed.
//!
//! ## Modules
//!
//! - `core`: positions, units, the unit registry, RNG, configuration, errors
//! - `grid`: cells and the `GridModel` (bounds, blocking, occupancy, distance)
//! - `turn`: initiative, action economy, MAP, reactions, the `TurnEngine`
//! - `combat`: the `CombatResolver` seam and degree-of-success helpers
//! - `session`: one encounter composing registry, grid and engine

pub mod core;
pub mod grid;
pub mod turn;
pub mod combat;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    GridPosition,
    UnitId, UnitCombatState, UnitRegistry, Ability, AbilityScores, Saves,
    GameRng, GameRngState,
    EncounterConfig, GridConfig,
    Result, TacticsError,
};

pub use crate::grid::{GridCell, GridModel};

pub use crate::turn::{
    ActionKind, multiple_attack_penalty,
    InitiativeEntry, InitiativeOrder,
    TurnEngine, TurnSnapshot, CombatPhase, EndOfTurnHook,
    ACTIONS_PER_TURN,
};

pub use crate::combat::{AttackContext, AttackOutcome, CombatResolver, DamageDice, degree_of_success};

pub use crate::session::Session;
