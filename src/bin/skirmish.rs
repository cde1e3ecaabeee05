//! Seeded demo encounter.
//!
//! ```text
//! RUST_LOG=grid_tactics=debug cargo run --bin skirmish -- [encounter.toml]
//! ```

use grid_tactics::combat::{degree_of_success, AttackContext, AttackOutcome, CombatResolver, DamageDice};
use grid_tactics::core::{Ability, EncounterConfig, GameRng, GridPosition, UnitCombatState, UnitId, UnitRegistry};
use grid_tactics::session::Session;

const MAX_ROUNDS: u32 = 3;

/// d20 + attack bonus + MAP against armor class; double damage on a crit.
struct BasicStrike;

impl CombatResolver for BasicStrike {
    fn resolve_strike(&mut self, ctx: &AttackContext, units: &mut UnitRegistry, rng: &mut GameRng) -> AttackOutcome {
        let (Some(attacker), Some(target)) = (units.get(ctx.attacker), units.get(ctx.target)) else {
            return AttackOutcome::Failure;
        };
        let natural = rng.d20();
        let total = natural + attacker.attack_bonus + ctx.map;
        let outcome = degree_of_success(total, target.armor_class, natural);

        let dice = DamageDice::parse(&attacker.weapon_damage);
        let damage = match (outcome, dice) {
            (AttackOutcome::CriticalSuccess, Some(d)) => d.roll(rng) * 2,
            (AttackOutcome::Success, Some(d)) => d.roll(rng),
            _ => 0,
        };

        tracing::info!(natural, total, ac = target.armor_class, ?outcome, damage, "attack roll");
        if let Some(target) = units.get_mut(ctx.target) {
            target.take_damage(damage);
        }
        outcome
    }
}

fn load_config() -> Result<EncounterConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(EncounterConfig::from_toml_str(&std::fs::read_to_string(path)?)?),
        None => Ok(EncounterConfig::new(7)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("grid_tactics=info,skirmish=info")),
        )
        .init();

    let mut session = Session::new(load_config()?)?;
    session.grid_mut().set_elevation(5, 3, 1);
    session.grid_mut().set_blocked(4, 4, true);

    let fighter = UnitCombatState::new("fighter", "Valeros")
        .with_max_hp(20)
        .with_armor_class(18)
        .with_ability(Ability::Wisdom, 12)
        .with_attack(9, "1d8+4");
    let rogue = UnitCombatState::new("rogue", "Merisiel")
        .with_max_hp(16)
        .with_armor_class(17)
        .with_ability(Ability::Wisdom, 14)
        .with_attack(8, "1d6+3");
    let goblin = UnitCombatState::new("goblin", "Goblin Warrior")
        .with_max_hp(6)
        .with_armor_class(16)
        .with_attack(8, "1d6");
    let orc = UnitCombatState::new("orc", "Orc Brute")
        .with_max_hp(15)
        .with_armor_class(15)
        .with_attack(7, "1d8+2");

    let players = [
        session.spawn_unit(fighter, GridPosition::planar(2, 2))?,
        session.spawn_unit(rogue, GridPosition::planar(2, 3))?,
    ];
    let enemies = [
        session.spawn_unit(goblin, GridPosition::planar(5, 2))?,
        session.spawn_unit(orc, GridPosition::planar(5, 3))?,
    ];

    session.start_combat(&players, &enemies);

    while session.in_combat() && session.turns().current_round() <= MAX_ROUNDS {
        let foes: &[UnitId] = if session.turns().is_player_turn() { &enemies } else { &players };
        let agile = session
            .turns()
            .current_unit(session.units())
            .is_some_and(|u| u.tag == "rogue");

        // Two strikes, then keep the last action.
        for _ in 0..2 {
            let Some(&target) = foes.iter().find(|&&id| session.units().contains(id)) else {
                break;
            };
            session.strike(&mut BasicStrike, target, agile)?;
            if session.units().get(target).is_some_and(|u| !u.is_alive()) {
                session.despawn_unit(target);
            }
        }

        let survivors = |ids: &[UnitId]| ids.iter().filter(|&&id| session.units().contains(id)).count();
        if survivors(&players) == 0 || survivors(&enemies) == 0 {
            session.end_combat();
            break;
        }
        session.update(1.0 / 60.0);
        session.end_turn();
    }

    let snapshot = session.snapshot();
    tracing::info!(
        round = snapshot.round,
        survivors = session.units().len(),
        "skirmish over"
    );
    for (id, unit) in session.units().iter() {
        tracing::info!(%id, unit = %unit.name, hp = unit.current_hp, pos = %unit.grid_position, "survivor");
    }
    Ok(())
}
