//! Units and their combat attributes.
//!
//! ## UnitId
//!
//! Units live in a [`UnitRegistry`](super::registry::UnitRegistry) and are
//! referenced everywhere else by `UnitId`: a slot index plus the generation
//! of that slot. Once a unit is despawned its id stops resolving, even when
//! the slot is reused, so the grid and the turn engine can never observe a
//! unit that no longer exists.
//!
//! ## UnitCombatState
//!
//! The attribute surface the turn engine reads and writes: hit points,
//! ability scores, speed and the per-turn action economy fields.

use serde::{Deserialize, Serialize};

use super::position::GridPosition;

/// Generation-checked handle to a unit in a `UnitRegistry`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    index: u32,
    generation: u32,
}

impl UnitId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the registry.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({}v{})", self.index, self.generation)
    }
}

/// The six ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Raw ability scores (10 = average).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// Score for one ability.
    #[must_use]
    pub const fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Set one ability score.
    #[must_use]
    pub fn with(mut self, ability: Ability, score: i32) -> Self {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
        self
    }

    /// Modifier for one ability: `(score - 10) / 2`.
    ///
    /// Integer division truncates toward zero, so a score of 9 gives 0 and
    /// 7 gives -1 (not -1 and -2 as flooring would).
    ///
    /// ```
    /// use grid_tactics::core::{Ability, AbilityScores};
    ///
    /// let scores = AbilityScores::default()
    ///     .with(Ability::Wisdom, 16)
    ///     .with(Ability::Strength, 7);
    /// assert_eq!(scores.modifier(Ability::Wisdom), 3);
    /// assert_eq!(scores.modifier(Ability::Strength), -1);
    /// ```
    #[must_use]
    pub const fn modifier(&self, ability: Ability) -> i32 {
        (self.score(ability) - 10) / 2
    }
}

/// Saving throw bonuses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saves {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

/// Combat attributes of one unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitCombatState {
    /// Stable string id (authoring-side identity).
    pub tag: String,
    /// Display name.
    pub name: String,
    pub level: i32,

    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    /// Speed in feet (25 = 5 squares).
    pub speed: i32,

    pub abilities: AbilityScores,
    pub saves: Saves,
    pub attack_bonus: i32,
    /// Damage expression, e.g. `1d6+2`.
    pub weapon_damage: String,

    pub grid_position: GridPosition,

    // === Encounter state ===
    /// Last initiative result, kept for display and debugging.
    pub initiative: i32,
    pub actions_remaining: u8,
    pub has_reaction: bool,
    pub current_map: i32,
}

impl UnitCombatState {
    /// Create a level 1 unit with 10 HP, AC 10, speed 25 and average scores.
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            level: 1,
            max_hp: 10,
            current_hp: 10,
            armor_class: 10,
            speed: 25,
            abilities: AbilityScores::default(),
            saves: Saves::default(),
            attack_bonus: 0,
            weapon_damage: "1d6+2".to_string(),
            grid_position: GridPosition::default(),
            initiative: 0,
            actions_remaining: crate::turn::ACTIONS_PER_TURN,
            has_reaction: true,
            current_map: 0,
        }
    }

    /// Set maximum HP and restore current HP to it.
    ///
    /// Chain [`with_current_hp`](Self::with_current_hp) after this one to
    /// start a unit wounded.
    #[must_use]
    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = max_hp;
        self.current_hp = max_hp;
        self
    }

    /// Set current HP, clamped to `0..=max_hp`.
    #[must_use]
    pub fn with_current_hp(mut self, hp: i32) -> Self {
        self.current_hp = hp.clamp(0, self.max_hp.max(0));
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_armor_class(mut self, ac: i32) -> Self {
        self.armor_class = ac;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability, score: i32) -> Self {
        self.abilities = self.abilities.with(ability, score);
        self
    }

    #[must_use]
    pub fn with_saves(mut self, saves: Saves) -> Self {
        self.saves = saves;
        self
    }

    #[must_use]
    pub fn with_attack(mut self, attack_bonus: i32, weapon_damage: impl Into<String>) -> Self {
        self.attack_bonus = attack_bonus;
        self.weapon_damage = weapon_damage.into();
        self
    }

    /// HP above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Ability modifier (truncating).
    #[must_use]
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// Perception stand-in used for initiative.
    #[must_use]
    pub fn perception_modifier(&self) -> i32 {
        self.modifier(Ability::Wisdom)
    }

    /// Speed converted to 5 ft squares.
    #[must_use]
    pub fn speed_in_squares(&self) -> i32 {
        self.speed / 5
    }

    /// Apply damage, clamping HP at zero. Non-positive amounts are ignored.
    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current_hp = (self.current_hp - amount).max(0);
        tracing::debug!(
            unit = %self.name,
            amount,
            hp = self.current_hp,
            max_hp = self.max_hp,
            "unit took damage"
        );
        if !self.is_alive() {
            tracing::info!(unit = %self.name, "unit has been defeated");
        }
    }

    /// Restore HP, clamping at max. Non-positive amounts are ignored.
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
        tracing::debug!(
            unit = %self.name,
            amount,
            hp = self.current_hp,
            max_hp = self.max_hp,
            "unit healed"
        );
    }
}
