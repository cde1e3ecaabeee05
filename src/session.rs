//! Encounter session: owns the unit registry, the grid and the turn engine.
//!
//! The session is the single writer. Callers drive it from one fixed-rate
//! simulation tick; presentation code may read the grid and the turn
//! snapshot in between.
//!
//! ```
//! use grid_tactics::core::{EncounterConfig, GridPosition, UnitCombatState};
//! use grid_tactics::session::Session;
//!
//! let mut session = Session::new(EncounterConfig::new(42)).unwrap();
//! let hero = session.spawn_unit(UnitCombatState::new("hero", "Hero"), GridPosition::planar(1, 1)).unwrap();
//! let orc = session.spawn_unit(UnitCombatState::new("orc", "Orc"), GridPosition::planar(4, 1)).unwrap();
//!
//! session.start_combat(&[hero], &[orc]);
//! assert!(session.in_combat());
//! assert_eq!(session.turns().current_round(), 1);
//! ```

use crate::combat::{AttackContext, AttackOutcome, CombatResolver};
use crate::core::{
    EncounterConfig, GameRng, GridPosition, Result, TacticsError, UnitCombatState, UnitId, UnitRegistry,
};
use crate::grid::GridModel;
use crate::turn::{ActionKind, TurnEngine, TurnSnapshot, TurnStage};

/// One tactical encounter.
#[derive(Clone, Debug)]
pub struct Session {
    config: EncounterConfig,
    units: UnitRegistry,
    grid: GridModel,
    turns: TurnEngine,
    rng: GameRng,
}

impl Session {
    /// Build the grid and an idle turn engine from `config`.
    pub fn new(config: EncounterConfig) -> Result<Self> {
        let grid = GridModel::from_config(&config.grid)?;
        let turns = TurnEngine::new(config.seed);
        let rng = GameRng::new(config.seed).for_context("attack");

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            seed = config.seed,
            "session initialized"
        );

        Ok(Self {
            config,
            units: UnitRegistry::new(),
            grid,
            turns,
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    #[must_use]
    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut UnitRegistry {
        &mut self.units
    }

    #[must_use]
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Mutable grid access for terrain edits (elevation, blocking).
    pub fn grid_mut(&mut self) -> &mut GridModel {
        &mut self.grid
    }

    #[must_use]
    pub fn turns(&self) -> &TurnEngine {
        &self.turns
    }

    // === Units ===

    /// Register a unit and place it on the grid.
    pub fn spawn_unit(&mut self, mut unit: UnitCombatState, pos: GridPosition) -> Result<UnitId> {
        let cell = self.grid.cell_at(pos).ok_or(TacticsError::InvalidPosition(pos))?;
        if cell.is_impassable() {
            return Err(TacticsError::CellBlocked(pos));
        }

        let placed = cell.position;
        unit.grid_position = placed;
        let name = unit.name.clone();
        let id = self.units.spawn(unit);
        self.grid.set_occupant(placed, id);

        tracing::debug!(unit = %name, %id, pos = %placed, "unit spawned");
        Ok(id)
    }

    /// Remove a unit from the grid and the registry.
    ///
    /// Its initiative entry, if any, is skipped from then on.
    pub fn despawn_unit(&mut self, id: UnitId) -> Option<UnitCombatState> {
        if let Some(pos) = self.grid.find_occupant(id) {
            self.grid.clear_occupant(pos);
        }
        let unit = self.units.despawn(id)?;
        tracing::debug!(unit = %unit.name, %id, "unit despawned");
        Some(unit)
    }

    /// Move a unit to another cell, updating occupancy.
    ///
    /// This is a placement, not a path: reachability and movement cost are
    /// the caller's business.
    pub fn move_unit(&mut self, id: UnitId, dest: GridPosition) -> Result<()> {
        let from = self
            .units
            .get(id)
            .map(|u| u.grid_position)
            .ok_or(TacticsError::UnknownUnit(id))?;
        let cell = self.grid.cell_at(dest).ok_or(TacticsError::InvalidPosition(dest))?;
        if cell.is_impassable() {
            return Err(TacticsError::CellBlocked(dest));
        }
        let to = cell.position;

        if self.grid.occupant(from) == Some(id) {
            self.grid.clear_occupant(from);
        }
        self.grid.set_occupant(to, id);
        if let Some(unit) = self.units.get_mut(id) {
            unit.grid_position = to;
        }

        tracing::debug!(%id, %from, %to, "unit moved");
        Ok(())
    }

    // === Combat ===

    pub fn start_combat(&mut self, players: &[UnitId], enemies: &[UnitId]) {
        self.turns.start_combat(&mut self.units, players, enemies);
    }

    pub fn end_combat(&mut self) {
        self.turns.end_combat();
    }

    #[must_use]
    pub fn in_combat(&self) -> bool {
        self.turns.is_combat_active()
    }

    /// Spend actions for the current unit. See [`TurnEngine::spend_actions`].
    pub fn spend_actions(&mut self, cost: u8, kind: ActionKind) -> bool {
        self.turns.spend_actions(&mut self.units, cost, kind)
    }

    /// Finish the current unit's turn and start the next one.
    pub fn end_turn(&mut self) {
        self.turns.start_next_turn(&mut self.units);
    }

    /// Spend the current unit's reaction.
    pub fn spend_reaction(&mut self) {
        self.turns.spend_reaction(&mut self.units);
    }

    /// Spend a specific unit's reaction outside its own turn.
    pub fn spend_reaction_for(&mut self, unit: UnitId) -> bool {
        self.turns.spend_reaction_for(&mut self.units, unit)
    }

    /// Have the current unit Strike `target` for one action.
    ///
    /// The penalty passed to the resolver is the one this attack takes,
    /// i.e. computed before the attack is counted.
    pub fn strike<R: CombatResolver>(&mut self, resolver: &mut R, target: UnitId, agile: bool) -> Result<AttackOutcome> {
        if !self.in_combat() {
            return Err(TacticsError::NotInCombat);
        }
        let attacker = self.turns.current_unit_id().ok_or(TacticsError::NotInCombat)?;
        let from = self
            .units
            .get(attacker)
            .map(|u| u.grid_position)
            .ok_or(TacticsError::UnknownUnit(attacker))?;
        let to = self
            .units
            .get(target)
            .map(|u| u.grid_position)
            .ok_or(TacticsError::UnknownUnit(target))?;

        if self.turns.turn_stage() == Some(TurnStage::Ended) {
            return Err(TacticsError::TurnEnded);
        }
        if !self.turns.can_spend_actions(1) {
            return Err(TacticsError::InsufficientActions {
                needed: 1,
                remaining: self.turns.actions_remaining(),
            });
        }

        let map = self.turns.map_for(agile);
        self.turns.spend_actions(&mut self.units, 1, ActionKind::Strike { agile });

        let ctx = AttackContext {
            attacker,
            target,
            map,
            actions_remaining: self.turns.actions_remaining(),
            distance: self.grid.distance(from, to),
            elevation_difference: self.grid.elevation_difference(from, to),
        };
        let outcome = resolver.resolve_strike(&ctx, &mut self.units, &mut self.rng);

        tracing::info!(%attacker, %target, map, ?outcome, "strike resolved");
        Ok(outcome)
    }

    /// Presentation view of the turn state.
    #[must_use]
    pub fn snapshot(&self) -> TurnSnapshot {
        self.turns.snapshot()
    }

    /// Fixed-rate simulation tick.
    ///
    /// Turn progression is driven by explicit commands; the tick currently
    /// only reports state while combat runs.
    pub fn update(&mut self, dt: f32) {
        if !self.in_combat() {
            return;
        }
        tracing::trace!(
            dt,
            round = self.turns.current_round(),
            turn = ?self.turns.current_turn_index(),
            actions = self.turns.actions_remaining(),
            "tick"
        );
    }
}
