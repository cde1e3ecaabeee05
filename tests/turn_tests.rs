//! Turn engine integration tests.
//!
//! Drives whole encounters through `TurnEngine` with a real registry:
//! initiative ordering, round wrapping, the action economy, MAP,
//! reactions and end-of-turn effects.

use grid_tactics::core::{Ability, TacticsError, UnitCombatState, UnitId, UnitRegistry};
use grid_tactics::turn::{multiple_attack_penalty, ActionKind, TurnEngine, ACTIONS_PER_TURN};
use proptest::prelude::*;

fn roster(units: &mut UnitRegistry, prefix: &str, n: usize) -> Vec<UnitId> {
    (0..n)
        .map(|i| units.spawn(UnitCombatState::new(format!("{prefix}{i}"), format!("{prefix} {i}"))))
        .collect()
}

fn encounter(seed: u64, players: usize, enemies: usize) -> (TurnEngine, UnitRegistry, Vec<UnitId>, Vec<UnitId>) {
    let mut units = UnitRegistry::new();
    let p = roster(&mut units, "player", players);
    let e = roster(&mut units, "enemy", enemies);
    let mut engine = TurnEngine::new(seed);
    engine.start_combat(&mut units, &p, &e);
    (engine, units, p, e)
}

// =============================================================================
// Combat lifecycle
// =============================================================================

#[test]
fn test_start_combat_begins_round_one() {
    let (engine, units, _, _) = encounter(1, 2, 2);

    assert!(engine.is_combat_active());
    assert_eq!(engine.current_round(), 1);
    assert_eq!(engine.current_turn_index(), Some(0));
    assert_eq!(engine.initiative_count(), 4);
    assert_eq!(engine.actions_remaining(), ACTIONS_PER_TURN);

    let first = engine.current_unit(&units).unwrap();
    assert_eq!(first.actions_remaining, ACTIONS_PER_TURN);
    assert!(first.has_reaction);
}

#[test]
fn test_end_combat_goes_idle() {
    let (mut engine, _, _, _) = encounter(2, 1, 3);
    engine.end_combat();

    assert!(!engine.is_combat_active());
    assert_eq!(engine.initiative_count(), 0);
    assert_eq!(engine.current_round(), 0);
    assert_eq!(engine.current_turn_index(), None);
    assert_eq!(engine.actions_remaining(), 0);

    // Idempotent.
    engine.end_combat();
    assert!(!engine.is_combat_active());
}

#[test]
fn test_same_seed_same_order() {
    let (a, _, _, _) = encounter(99, 3, 3);
    let (b, _, _, _) = encounter(99, 3, 3);
    let initiatives = |e: &TurnEngine| e.initiative_order().iter().map(|x| x.initiative).collect::<Vec<_>>();
    assert_eq!(initiatives(&a), initiatives(&b));
}

#[test]
fn test_wisdom_feeds_initiative() {
    let mut units = UnitRegistry::new();
    let sage = units.spawn(UnitCombatState::new("sage", "Sage").with_ability(Ability::Wisdom, 30));
    let mut engine = TurnEngine::new(5);
    engine.start_combat(&mut units, &[sage], &[]);

    let rolled = units.get(sage).unwrap().initiative;
    assert!((11..=30).contains(&rolled), "d20 + 10 gave {rolled}");
    assert_eq!(engine.initiative_entry(0).unwrap().initiative, rolled);
}

#[test]
fn test_no_living_units_is_inert() {
    let mut units = UnitRegistry::new();
    let dead = units.spawn(UnitCombatState::new("ghost", "Ghost").with_current_hp(0));
    let mut engine = TurnEngine::new(3);
    engine.start_combat(&mut units, &[dead], &[]);

    assert!(engine.is_combat_active());
    assert_eq!(engine.initiative_count(), 0);

    engine.start_next_turn(&mut units);
    assert_eq!(engine.current_round(), 1);
    assert_eq!(engine.current_turn_index(), None);
    assert!(!engine.spend_actions(&mut units, 1, ActionKind::Other));
}

// =============================================================================
// Turn and round progression
// =============================================================================

#[test]
fn test_full_lap_advances_round_once() {
    let (mut engine, mut units, _, _) = encounter(11, 2, 3);
    let n = engine.initiative_count();

    for _ in 0..n {
        engine.start_next_turn(&mut units);
    }

    assert_eq!(engine.current_round(), 2);
    assert_eq!(engine.current_turn_index(), Some(0));
}

#[test]
fn test_new_turn_refreshes_unit() {
    let (mut engine, mut units, _, _) = encounter(4, 1, 1);
    let first = engine.current_unit_id().unwrap();

    assert!(engine.spend_actions(&mut units, 2, ActionKind::STRIKE));
    engine.spend_reaction(&mut units);
    assert_eq!(units.get(first).unwrap().actions_remaining, 1);
    assert!(!units.get(first).unwrap().has_reaction);

    // Around the table and back.
    engine.start_next_turn(&mut units);
    engine.start_next_turn(&mut units);

    assert_eq!(engine.current_unit_id(), Some(first));
    let unit = units.get(first).unwrap();
    assert_eq!(unit.actions_remaining, ACTIONS_PER_TURN);
    assert!(unit.has_reaction);
    assert_eq!(unit.current_map, 0);
}

#[test]
fn test_despawned_units_are_skipped() {
    let (mut engine, mut units, _, _) = encounter(8, 2, 2);
    let second = engine.initiative_entry(1).unwrap().unit;
    let third = engine.initiative_entry(2).unwrap().unit;
    units.despawn(second);

    engine.start_next_turn(&mut units);
    assert_eq!(engine.current_unit_id(), Some(third));
    assert_eq!(engine.current_turn_index(), Some(2));
}

#[test]
fn test_end_of_turn_hook_runs_once_per_turn() {
    let mut units = UnitRegistry::new();
    let burning = units.spawn(UnitCombatState::new("b", "Burning").with_max_hp(10));

    let hook = |_id: UnitId, unit: &mut UnitCombatState| unit.take_damage(1);
    let mut engine = TurnEngine::with_hook(6, hook);
    engine.start_combat(&mut units, &[burning], &[]);

    engine.end_current_turn(&mut units);
    engine.end_current_turn(&mut units);
    assert_eq!(units.get(burning).unwrap().current_hp, 9);

    engine.start_next_turn(&mut units);
    engine.start_next_turn(&mut units);
    assert_eq!(units.get(burning).unwrap().current_hp, 8);
    assert_eq!(engine.current_round(), 3);
}

// =============================================================================
// Action economy and MAP
// =============================================================================

#[test]
fn test_overspending_is_a_no_op() {
    let (mut engine, mut units, _, _) = encounter(12, 1, 1);

    assert!(!engine.spend_actions(&mut units, 4, ActionKind::Other));
    assert_eq!(engine.actions_remaining(), 3);
    assert_eq!(engine.attacks_this_turn(), 0);
}

#[test]
fn test_map_table() {
    assert_eq!(multiple_attack_penalty(0, false), 0);
    assert_eq!(multiple_attack_penalty(1, false), -5);
    assert_eq!(multiple_attack_penalty(2, false), -10);
    assert_eq!(multiple_attack_penalty(5, false), -10);
    assert_eq!(multiple_attack_penalty(0, true), 0);
    assert_eq!(multiple_attack_penalty(1, true), -4);
    assert_eq!(multiple_attack_penalty(2, true), -8);
}

#[test]
fn test_map_escalates_with_attacks_only() {
    let (mut engine, mut units, _, _) = encounter(13, 1, 1);

    assert!(engine.spend_actions(&mut units, 1, ActionKind::Stride));
    assert_eq!(engine.current_map(), 0);

    assert!(engine.spend_actions(&mut units, 1, ActionKind::Strike { agile: true }));
    assert_eq!(engine.current_map(), -4);
    assert_eq!(engine.map_for(false), -5);

    assert!(engine.spend_actions(&mut units, 1, ActionKind::SpellAttack));
    assert_eq!(engine.attacks_this_turn(), 2);
    assert_eq!(engine.actions_remaining(), 0);
    assert!(!engine.can_spend_actions(1));

    let unit = engine.current_unit(&units).unwrap();
    assert_eq!(unit.actions_remaining, 0);
    assert_eq!(unit.current_map, engine.current_map());
}

#[test]
fn test_spell_save_does_not_count() {
    let (mut engine, mut units, _, _) = encounter(14, 1, 0);
    assert!(engine.spend_actions(&mut units, 2, ActionKind::SpellSave));
    assert_eq!(engine.attacks_this_turn(), 0);
    assert_eq!(engine.current_map(), 0);
}

// =============================================================================
// Reactions and delay
// =============================================================================

#[test]
fn test_reaction_spent_out_of_turn() {
    let (mut engine, mut units, p, e) = encounter(15, 1, 1);
    let waiting = if engine.current_unit_id() == Some(p[0]) { e[0] } else { p[0] };

    assert!(engine.has_reaction_for(&units, waiting));
    assert!(engine.spend_reaction_for(&mut units, waiting));
    assert!(!engine.spend_reaction_for(&mut units, waiting));

    engine.start_next_turn(&mut units);
    assert_eq!(engine.current_unit_id(), Some(waiting));
    assert!(engine.has_reaction(&units));
}

#[test]
fn test_delay_is_unsupported() {
    let (mut engine, _, _, _) = encounter(16, 1, 1);
    assert!(matches!(engine.delay_turn(), Err(TacticsError::Unsupported(_))));
    assert!(matches!(engine.insert_delayed_unit(0), Err(TacticsError::Unsupported(_))));
    assert_eq!(engine.current_turn_index(), Some(0));
}

#[test]
fn test_snapshot_serializes() {
    let (engine, _, _, _) = encounter(17, 2, 1);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.order.len(), 3);
    assert_eq!(snapshot.round, 1);

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: grid_tactics::turn::TurnSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_initiative_order_well_formed(
        seed in any::<u64>(),
        players in prop::collection::vec(any::<bool>(), 0..6),
        enemies in prop::collection::vec(any::<bool>(), 0..6),
    ) {
        let mut units = UnitRegistry::new();
        let mut spawn = |alive: bool| {
            let hp = if alive { 10 } else { 0 };
            units.spawn(UnitCombatState::new("u", "Unit").with_current_hp(hp))
        };
        let p: Vec<_> = players.iter().map(|&alive| spawn(alive)).collect();
        let e: Vec<_> = enemies.iter().map(|&alive| spawn(alive)).collect();

        let mut engine = TurnEngine::new(seed);
        engine.start_combat(&mut units, &p, &e);

        let alive = players.iter().chain(&enemies).filter(|&&a| a).count();
        let order = engine.initiative_order();
        prop_assert_eq!(order.len(), alive);

        for pair in order.windows(2) {
            prop_assert!(pair[0].initiative >= pair[1].initiative);
            if pair[0].initiative == pair[1].initiative {
                prop_assert!(pair[0].is_player_unit || !pair[1].is_player_unit);
            }
        }
    }
}
