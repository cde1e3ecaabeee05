//! Turn engine: initiative, rounds and the three-action economy.
//!
//! ## States
//!
//! ```text
//! Idle --start_combat--> Active { round, order, turn }
//!                          turn: None -> Acting -> Ended -> next Acting ...
//!                                                  (wraps: round + 1)
//! Active --end_combat--> Idle
//! ```
//!
//! Combat state is a tagged enum, so "inactive combat with a current turn"
//! cannot be represented. Observers see round 0 and no turn index while
//! idle.
//!
//! ## Failure semantics
//!
//! Operations are total. Overspending actions, acting with no turn active
//! and similar misuse are logged and leave state untouched. Only the
//! unsupported delay operations return an error.
//!
//! ## Example
//!
//! ```
//! use grid_tactics::core::{UnitCombatState, UnitRegistry};
//! use grid_tactics::turn::{ActionKind, TurnEngine};
//!
//! let mut units = UnitRegistry::new();
//! let hero = units.spawn(UnitCombatState::new("hero", "Hero"));
//! let orc = units.spawn(UnitCombatState::new("orc", "Orc"));
//!
//! let mut engine = TurnEngine::new(42);
//! engine.start_combat(&mut units, &[hero], &[orc]);
//!
//! assert_eq!(engine.current_round(), 1);
//! assert_eq!(engine.actions_remaining(), 3);
//!
//! assert!(engine.spend_actions(&mut units, 1, ActionKind::STRIKE));
//! assert_eq!(engine.current_map(), -5);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Result, TacticsError, UnitCombatState, UnitId, UnitRegistry};

use super::action::{multiple_attack_penalty, ActionKind};
use super::initiative::{sort_initiative_order, InitiativeEntry, InitiativeOrder};
use super::{ACTIONS_PER_TURN, INITIATIVE_DIE};

/// Effects applied to a unit when its turn ends.
///
/// This is the seam for condition decrements (frightened, stunned,
/// slowed) and persistent damage checks once a condition system exists.
pub trait EndOfTurnHook {
    fn on_turn_end(&mut self, unit: UnitId, state: &mut UnitCombatState);
}

/// Default hook: no end-of-turn effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEndOfTurnEffects;

impl EndOfTurnHook for NoEndOfTurnEffects {
    fn on_turn_end(&mut self, _unit: UnitId, _state: &mut UnitCombatState) {}
}

impl<F> EndOfTurnHook for F
where
    F: FnMut(UnitId, &mut UnitCombatState),
{
    fn on_turn_end(&mut self, unit: UnitId, state: &mut UnitCombatState) {
        self(unit, state);
    }
}

/// Where the current unit is within its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStage {
    /// Spending actions.
    Acting,
    /// End-of-turn effects applied; waiting for the next turn to start.
    Ended,
}

/// Per-turn counters for the unit whose turn it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub index: usize,
    pub stage: TurnStage,
    pub actions_remaining: u8,
    pub attacks_this_turn: u8,
    pub used_agile_weapon: bool,
}

impl TurnState {
    fn begin(index: usize) -> Self {
        Self {
            index,
            stage: TurnStage::Acting,
            actions_remaining: ACTIONS_PER_TURN,
            attacks_this_turn: 0,
            used_agile_weapon: false,
        }
    }

    fn current_map(&self) -> i32 {
        multiple_attack_penalty(self.attacks_this_turn, self.used_agile_weapon)
    }
}

/// A running encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveCombat {
    pub round: u32,
    pub order: InitiativeOrder,
    /// `None` until the first turn starts.
    pub turn: Option<TurnState>,
}

impl ActiveCombat {
    fn advance_round(&mut self) {
        self.round += 1;
        tracing::info!(round = self.round, "===== ROUND {} =====", self.round);
    }
}

/// Idle, or an encounter in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CombatPhase {
    #[default]
    Idle,
    Active(ActiveCombat),
}

/// Presentation-facing view of the turn engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub combat_active: bool,
    pub round: u32,
    pub turn_index: Option<usize>,
    pub current_unit: Option<UnitId>,
    pub actions_remaining: u8,
    pub current_map: i32,
    pub is_player_turn: bool,
    pub order: Vec<InitiativeEntry>,
}

/// Initiative, turn and round state machine.
///
/// Units are read and written through the `UnitRegistry` passed to each
/// call; the engine itself only holds `UnitId`s.
#[derive(Clone, Debug)]
pub struct TurnEngine<H = NoEndOfTurnEffects> {
    phase: CombatPhase,
    rng: GameRng,
    hook: H,
}

impl TurnEngine {
    /// Create an idle engine whose initiative rolls derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_hook(seed, NoEndOfTurnEffects)
    }
}

impl<H: EndOfTurnHook> TurnEngine<H> {
    /// Create an idle engine with a custom end-of-turn hook.
    pub fn with_hook(seed: u64, hook: H) -> Self {
        Self {
            phase: CombatPhase::Idle,
            rng: GameRng::new(seed).for_context("initiative"),
            hook,
        }
    }

    // === Combat lifecycle ===

    /// Roll initiative for every living unit, sort, and start the first turn.
    ///
    /// Handles that do not resolve and units at 0 HP are left out. Calling
    /// this during combat is a caller error; the running encounter is
    /// discarded and a new one started.
    pub fn start_combat(&mut self, units: &mut UnitRegistry, players: &[UnitId], enemies: &[UnitId]) {
        if self.is_combat_active() {
            tracing::warn!("start_combat called while combat is active; restarting encounter");
            self.end_combat();
        }

        tracing::info!(players = players.len(), enemies = enemies.len(), "starting combat, rolling initiative");

        let mut order = InitiativeOrder::new();
        let sides = players
            .iter()
            .map(|&id| (id, true))
            .chain(enemies.iter().map(|&id| (id, false)));

        for (id, is_player_unit) in sides {
            let Some(unit) = units.get_mut(id) else {
                tracing::debug!(%id, "skipping unknown unit");
                continue;
            };
            if !unit.is_alive() {
                tracing::debug!(unit = %unit.name, "skipping defeated unit");
                continue;
            }
            let initiative = self.roll_initiative(unit);
            order.push(InitiativeEntry::new(id, initiative, is_player_unit));
        }

        sort_initiative_order(&mut order);

        for (i, entry) in order.iter().enumerate() {
            let name = units.get(entry.unit).map_or("?", |u| u.name.as_str());
            tracing::info!(
                "  {}. {} (initiative {}) [{}]",
                i + 1,
                name,
                entry.initiative,
                if entry.is_player_unit { "PLAYER" } else { "ENEMY" }
            );
        }
        if order.is_empty() {
            tracing::warn!("combat started with no living units; turns cannot advance");
        }

        self.phase = CombatPhase::Active(ActiveCombat {
            round: 1,
            order,
            turn: None,
        });

        self.start_next_turn(units);
    }

    /// Leave combat. Safe to call when already idle.
    pub fn end_combat(&mut self) {
        if let CombatPhase::Active(combat) = &self.phase {
            tracing::info!(rounds = combat.round, "combat ended");
            self.phase = CombatPhase::Idle;
        }
    }

    #[must_use]
    pub fn is_combat_active(&self) -> bool {
        matches!(self.phase, CombatPhase::Active(_))
    }

    #[must_use]
    pub fn phase(&self) -> &CombatPhase {
        &self.phase
    }

    // === Initiative ===

    /// Roll d20 + Wisdom modifier and record it on the unit.
    pub fn roll_initiative(&mut self, unit: &mut UnitCombatState) -> i32 {
        let roll = self.rng.roll_die(INITIATIVE_DIE);
        let modifier = unit.perception_modifier();
        let initiative = roll + modifier;
        unit.initiative = initiative;

        tracing::debug!(
            unit = %unit.name,
            roll,
            modifier,
            initiative,
            "rolled initiative"
        );
        initiative
    }

    /// Re-sort the current order. Only meaningful during combat.
    pub fn sort_initiative_order(&mut self) {
        if let CombatPhase::Active(combat) = &mut self.phase {
            sort_initiative_order(&mut combat.order);
        }
    }

    #[must_use]
    pub fn initiative_order(&self) -> &[InitiativeEntry] {
        match &self.phase {
            CombatPhase::Active(combat) => &combat.order,
            CombatPhase::Idle => &[],
        }
    }

    #[must_use]
    pub fn initiative_count(&self) -> usize {
        self.initiative_order().len()
    }

    #[must_use]
    pub fn initiative_entry(&self, index: usize) -> Option<&InitiativeEntry> {
        self.initiative_order().get(index)
    }

    // === Turn progression ===

    /// End the current turn (if one is acting) and start the next one.
    ///
    /// Running off the end of the order advances the round and wraps to the
    /// top. Entries whose unit has been despawned are skipped. With no
    /// resolvable entries this does nothing.
    pub fn start_next_turn(&mut self, units: &mut UnitRegistry) {
        self.end_current_turn(units);

        let CombatPhase::Active(combat) = &mut self.phase else {
            tracing::debug!("start_next_turn ignored: no combat active");
            return;
        };

        if !combat.order.iter().any(|e| units.contains(e.unit)) {
            tracing::warn!("start_next_turn ignored: initiative order has no living entries");
            return;
        }

        let len = combat.order.len();
        let mut next = combat.turn.map_or(0, |t| t.index + 1);
        loop {
            if next >= len {
                combat.advance_round();
                next = 0;
            }
            if units.contains(combat.order[next].unit) {
                break;
            }
            tracing::debug!(unit = %combat.order[next].unit, "skipping despawned unit");
            next += 1;
        }

        combat.turn = Some(TurnState::begin(next));
        let entry = combat.order[next];

        if let Some(unit) = units.get_mut(entry.unit) {
            unit.actions_remaining = ACTIONS_PER_TURN;
            unit.has_reaction = true;
            unit.current_map = 0;

            tracing::info!(
                "=== TURN {} (Round {}) === {} ({})",
                next + 1,
                combat.round,
                unit.name,
                if entry.is_player_unit { "PLAYER" } else { "ENEMY" }
            );
        }
    }

    /// Apply end-of-turn effects to the current unit.
    ///
    /// Does nothing unless a turn is acting, so effects run once per turn.
    pub fn end_current_turn(&mut self, units: &mut UnitRegistry) {
        let Self { phase, hook, .. } = self;
        let CombatPhase::Active(combat) = phase else {
            return;
        };
        let Some(turn) = combat.turn.as_mut().filter(|t| t.stage == TurnStage::Acting) else {
            return;
        };

        turn.stage = TurnStage::Ended;
        let id = combat.order[turn.index].unit;
        if let Some(unit) = units.get_mut(id) {
            tracing::debug!(unit = %unit.name, "ending turn");
            hook.on_turn_end(id, unit);
        }
    }

    /// Advance the round counter. No effect while idle.
    pub fn advance_round(&mut self) {
        if let CombatPhase::Active(combat) = &mut self.phase {
            combat.advance_round();
        }
    }

    #[must_use]
    pub fn current_round(&self) -> u32 {
        match &self.phase {
            CombatPhase::Active(combat) => combat.round,
            CombatPhase::Idle => 0,
        }
    }

    fn turn(&self) -> Option<&TurnState> {
        match &self.phase {
            CombatPhase::Active(combat) => combat.turn.as_ref(),
            CombatPhase::Idle => None,
        }
    }

    fn acting_turn_mut(&mut self) -> Option<&mut TurnState> {
        match &mut self.phase {
            CombatPhase::Active(combat) => combat.turn.as_mut().filter(|t| t.stage == TurnStage::Acting),
            CombatPhase::Idle => None,
        }
    }

    /// Index of the current entry in the initiative order.
    #[must_use]
    pub fn current_turn_index(&self) -> Option<usize> {
        self.turn().map(|t| t.index)
    }

    #[must_use]
    pub fn turn_stage(&self) -> Option<TurnStage> {
        self.turn().map(|t| t.stage)
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&InitiativeEntry> {
        self.current_turn_index().and_then(|i| self.initiative_entry(i))
    }

    /// Handle of the unit whose turn it is.
    #[must_use]
    pub fn current_unit_id(&self) -> Option<UnitId> {
        self.current_entry().map(|e| e.unit)
    }

    /// The unit whose turn it is, if its handle still resolves.
    #[must_use]
    pub fn current_unit<'a>(&self, units: &'a UnitRegistry) -> Option<&'a UnitCombatState> {
        self.current_unit_id().and_then(|id| units.get(id))
    }

    #[must_use]
    pub fn is_player_turn(&self) -> bool {
        self.current_entry().is_some_and(|e| e.is_player_unit)
    }

    // === Action economy ===

    /// Actions left this turn (0 when no turn is running).
    #[must_use]
    pub fn actions_remaining(&self) -> u8 {
        self.turn().map_or(0, |t| t.actions_remaining)
    }

    #[must_use]
    pub fn attacks_this_turn(&self) -> u8 {
        self.turn().map_or(0, |t| t.attacks_this_turn)
    }

    #[must_use]
    pub fn used_agile_weapon(&self) -> bool {
        self.turn().is_some_and(|t| t.used_agile_weapon)
    }

    #[must_use]
    pub fn can_spend_actions(&self, cost: u8) -> bool {
        self.turn()
            .is_some_and(|t| t.stage == TurnStage::Acting && t.actions_remaining >= cost)
    }

    /// Spend `cost` actions on an action of `kind`.
    ///
    /// Returns false and changes nothing if the turn cannot afford it.
    /// Attack actions advance the multiple attack penalty; a Strike also
    /// records whether its weapon was agile. The current unit's
    /// `actions_remaining` and `current_map` are kept in step.
    pub fn spend_actions(&mut self, units: &mut UnitRegistry, cost: u8, kind: ActionKind) -> bool {
        let Some(turn) = self.acting_turn_mut() else {
            tracing::warn!(cost, ?kind, "spend_actions ignored: no turn is active");
            return false;
        };
        if turn.actions_remaining < cost {
            tracing::warn!(
                "not enough actions: need {}, have {}",
                cost,
                turn.actions_remaining
            );
            return false;
        }

        turn.actions_remaining -= cost;
        if let ActionKind::Strike { agile } = kind {
            turn.used_agile_weapon = agile;
        }
        if kind.is_attack() {
            turn.attacks_this_turn = turn.attacks_this_turn.saturating_add(1);
            tracing::debug!(
                attack = turn.attacks_this_turn,
                next_map = turn.current_map(),
                "attack this turn"
            );
        }

        let remaining = turn.actions_remaining;
        let map = turn.current_map();
        tracing::debug!(remaining, "actions remaining");

        if let Some(unit) = self.current_unit_id().and_then(|id| units.get_mut(id)) {
            unit.actions_remaining = remaining;
            unit.current_map = map;
        }
        true
    }

    /// Penalty the next attack this turn takes, using the last weapon's
    /// agility.
    #[must_use]
    pub fn current_map(&self) -> i32 {
        self.turn().map_or(0, TurnState::current_map)
    }

    /// Penalty the next attack would take with an agile or non-agile weapon.
    #[must_use]
    pub fn map_for(&self, agile: bool) -> i32 {
        multiple_attack_penalty(self.attacks_this_turn(), agile)
    }

    // === Reactions ===

    /// Whether the current unit still has its reaction.
    #[must_use]
    pub fn has_reaction(&self, units: &UnitRegistry) -> bool {
        self.current_unit(units).is_some_and(|u| u.has_reaction)
    }

    /// Spend the current unit's reaction. Idempotent.
    pub fn spend_reaction(&mut self, units: &mut UnitRegistry) {
        if let Some(id) = self.current_unit_id() {
            self.spend_reaction_for(units, id);
        }
    }

    /// Whether `unit` has its reaction available.
    #[must_use]
    pub fn has_reaction_for(&self, units: &UnitRegistry, unit: UnitId) -> bool {
        units.get(unit).is_some_and(|u| u.has_reaction)
    }

    /// Spend `unit`'s reaction, e.g. for an out-of-turn response.
    ///
    /// Returns true if a reaction was actually spent.
    pub fn spend_reaction_for(&mut self, units: &mut UnitRegistry, unit: UnitId) -> bool {
        match units.get_mut(unit) {
            Some(state) if state.has_reaction => {
                state.has_reaction = false;
                tracing::debug!(unit = %state.name, "reaction spent");
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!(%unit, "spend_reaction ignored: unknown unit");
                false
            }
        }
    }

    // === Delay ===

    /// Delay the current unit's turn. Not supported yet.
    pub fn delay_turn(&mut self) -> Result<()> {
        tracing::info!("delay_turn is not implemented");
        Err(TacticsError::Unsupported("delay turn"))
    }

    /// Re-insert a delayed unit into the order. Not supported yet.
    pub fn insert_delayed_unit(&mut self, index: usize) -> Result<()> {
        tracing::info!(index, "insert_delayed_unit is not implemented");
        Err(TacticsError::Unsupported("insert delayed unit"))
    }

    // === Presentation ===

    #[must_use]
    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            combat_active: self.is_combat_active(),
            round: self.current_round(),
            turn_index: self.current_turn_index(),
            current_unit: self.current_unit_id(),
            actions_remaining: self.actions_remaining(),
            current_map: self.current_map(),
            is_player_turn: self.is_player_turn(),
            order: self.initiative_order().to_vec(),
        }
    }
}
