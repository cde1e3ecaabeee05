//! Combat resolution interface.
//!
//! A resolver turns an attack declaration into an outcome. The turn engine
//! has already charged the action and counted the attack by the time a
//! resolver runs; the resolver only sees the penalty and geometry it
//! should apply.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, UnitId, UnitRegistry};

/// Everything a resolver needs to know about one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackContext {
    pub attacker: UnitId,
    pub target: UnitId,
    /// Multiple attack penalty for this attack (0, -4/-5, -8/-10).
    pub map: i32,
    /// Actions the attacker has left after paying for this attack.
    pub actions_remaining: u8,
    /// Grid distance in cells.
    pub distance: i32,
    /// Target elevation minus attacker elevation.
    pub elevation_difference: i32,
}

/// Four degrees of success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackOutcome {
    CriticalFailure,
    Failure,
    Success,
    CriticalSuccess,
}

impl AttackOutcome {
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, AttackOutcome::Success | AttackOutcome::CriticalSuccess)
    }

    const fn step_up(self) -> Self {
        match self {
            AttackOutcome::CriticalFailure => AttackOutcome::Failure,
            AttackOutcome::Failure => AttackOutcome::Success,
            AttackOutcome::Success | AttackOutcome::CriticalSuccess => AttackOutcome::CriticalSuccess,
        }
    }

    const fn step_down(self) -> Self {
        match self {
            AttackOutcome::CriticalSuccess => AttackOutcome::Success,
            AttackOutcome::Success => AttackOutcome::Failure,
            AttackOutcome::Failure | AttackOutcome::CriticalFailure => AttackOutcome::CriticalFailure,
        }
    }
}

/// Degree of success for a check.
///
/// Beating the DC by 10 is a critical success, missing by 10 a critical
/// failure. A natural 20 then improves the result one step and a natural 1
/// worsens it one step.
///
/// ```
/// use grid_tactics::combat::{degree_of_success, AttackOutcome};
///
/// assert_eq!(degree_of_success(25, 15, 12), AttackOutcome::CriticalSuccess);
/// assert_eq!(degree_of_success(14, 15, 20), AttackOutcome::Success);
/// assert_eq!(degree_of_success(16, 15, 1), AttackOutcome::Failure);
/// ```
#[must_use]
pub fn degree_of_success(total: i32, dc: i32, natural: i32) -> AttackOutcome {
    let base = if total >= dc + 10 {
        AttackOutcome::CriticalSuccess
    } else if total >= dc {
        AttackOutcome::Success
    } else if total <= dc - 10 {
        AttackOutcome::CriticalFailure
    } else {
        AttackOutcome::Failure
    };

    match natural {
        20 => base.step_up(),
        1 => base.step_down(),
        _ => base,
    }
}

/// Combat resolution system.
///
/// Implementations roll the attack, apply damage through the registry and
/// report the outcome. They must draw randomness only from `rng` so an
/// encounter replays identically from its seed.
pub trait CombatResolver {
    fn resolve_strike(&mut self, ctx: &AttackContext, units: &mut UnitRegistry, rng: &mut GameRng) -> AttackOutcome;
}
