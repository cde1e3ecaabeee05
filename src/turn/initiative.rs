//! Initiative entries and turn ordering.
//!
//! Order is highest initiative first. At equal initiative player units act
//! before enemies; anything still tied keeps the order it was inserted in
//! (players first, then enemies, each in the order given), so a fixed seed
//! always produces the same turn order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::UnitId;

/// One unit's place in the initiative order for one encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    pub unit: UnitId,
    pub initiative: i32,
    pub is_player_unit: bool,
}

impl InitiativeEntry {
    #[must_use]
    pub const fn new(unit: UnitId, initiative: i32, is_player_unit: bool) -> Self {
        Self {
            unit,
            initiative,
            is_player_unit,
        }
    }
}

/// Turn order for one encounter. Small encounters stay on the stack.
pub type InitiativeOrder = SmallVec<[InitiativeEntry; 8]>;

/// Sort entries into turn order (stable).
pub fn sort_initiative_order(entries: &mut [InitiativeEntry]) {
    entries.sort_by(|a, b| {
        b.initiative
            .cmp(&a.initiative)
            .then_with(|| b.is_player_unit.cmp(&a.is_player_unit))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{UnitCombatState, UnitRegistry};

    fn ids(n: usize) -> Vec<UnitId> {
        let mut registry = UnitRegistry::new();
        (0..n)
            .map(|i| registry.spawn(UnitCombatState::new(format!("u{i}"), "U")))
            .collect()
    }

    #[test]
    fn test_descending_by_initiative() {
        let u = ids(3);
        let mut order = vec![
            InitiativeEntry::new(u[0], 5, true),
            InitiativeEntry::new(u[1], 18, false),
            InitiativeEntry::new(u[2], 11, true),
        ];

        sort_initiative_order(&mut order);

        let values: Vec<_> = order.iter().map(|e| e.initiative).collect();
        assert_eq!(values, vec![18, 11, 5]);
    }

    #[test]
    fn test_players_win_ties() {
        let u = ids(2);
        let mut order = vec![
            InitiativeEntry::new(u[0], 12, false),
            InitiativeEntry::new(u[1], 12, true),
        ];

        sort_initiative_order(&mut order);

        assert!(order[0].is_player_unit);
        assert_eq!(order[0].unit, u[1]);
    }

    #[test]
    fn test_full_ties_keep_insertion_order() {
        let u = ids(4);
        let mut order = vec![
            InitiativeEntry::new(u[0], 10, true),
            InitiativeEntry::new(u[1], 10, true),
            InitiativeEntry::new(u[2], 10, false),
            InitiativeEntry::new(u[3], 10, false),
        ];

        sort_initiative_order(&mut order);

        let sorted: Vec<_> = order.iter().map(|e| e.unit).collect();
        assert_eq!(sorted, u);
    }

    #[test]
    fn test_negative_initiative() {
        let u = ids(2);
        let mut order = vec![
            InitiativeEntry::new(u[0], -2, true),
            InitiativeEntry::new(u[1], 0, false),
        ];

        sort_initiative_order(&mut order);

        assert_eq!(order[0].unit, u[1]);
    }
}
