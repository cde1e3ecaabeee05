//! Action kinds and the multiple attack penalty.
//!
//! Every action a unit takes costs one or more of its three actions. Only
//! attack rolls (Strikes and spell attacks) count toward the multiple
//! attack penalty; saving-throw spells, movement and most abilities do not.

use serde::{Deserialize, Serialize};

/// What an action is, as far as the action economy cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Melee or ranged Strike. `agile` weapons take a reduced penalty.
    Strike { agile: bool },
    /// Spell with an attack roll.
    SpellAttack,
    /// Spell that forces a saving throw.
    SpellSave,
    /// Movement.
    Stride,
    /// Class or creature ability without an attack roll.
    Ability,
    /// Anything else (Interact, Raise a Shield, ...).
    Other,
}

impl ActionKind {
    /// Melee Strike with a non-agile weapon.
    pub const STRIKE: ActionKind = ActionKind::Strike { agile: false };

    /// Whether this action makes an attack roll and so advances the penalty.
    #[must_use]
    pub const fn is_attack(self) -> bool {
        matches!(self, ActionKind::Strike { .. } | ActionKind::SpellAttack)
    }

    /// Whether the weapon used is agile. Only Strikes can be.
    #[must_use]
    pub const fn is_agile(self) -> bool {
        matches!(self, ActionKind::Strike { agile: true })
    }
}

/// Penalty for the next attack after `attacks_made` attacks this turn.
///
/// | attacks made | standard | agile |
/// |--------------|----------|-------|
/// | 0            | 0        | 0     |
/// | 1            | -5       | -4    |
/// | 2 or more    | -10      | -8    |
///
/// ```
/// use grid_tactics::turn::multiple_attack_penalty;
///
/// assert_eq!(multiple_attack_penalty(0, false), 0);
/// assert_eq!(multiple_attack_penalty(1, true), -4);
/// assert_eq!(multiple_attack_penalty(5, false), -10);
/// ```
#[must_use]
pub const fn multiple_attack_penalty(attacks_made: u8, agile: bool) -> i32 {
    match (attacks_made, agile) {
        (0, _) => 0,
        (1, true) => -4,
        (1, false) => -5,
        (_, true) => -8,
        (_, false) => -10,
    }
}
