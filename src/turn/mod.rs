//! Turn-based combat flow.
//!
//! - `action`: action kinds and the multiple attack penalty
//! - `initiative`: initiative entries and ordering
//! - `engine`: the `TurnEngine` state machine

pub mod action;
pub mod initiative;
pub mod engine;

pub use action::{multiple_attack_penalty, ActionKind};
pub use initiative::{sort_initiative_order, InitiativeEntry, InitiativeOrder};
pub use engine::{
    ActiveCombat, CombatPhase, EndOfTurnHook, NoEndOfTurnEffects, TurnEngine, TurnSnapshot, TurnStage, TurnState,
};

/// Actions each unit gets at the start of its turn.
pub const ACTIONS_PER_TURN: u8 = 3;

/// Faces on the initiative die.
pub const INITIATIVE_DIE: u32 = 20;
