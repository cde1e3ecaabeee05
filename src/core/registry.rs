//! Unit registry.
//!
//! The `UnitRegistry` owns every unit's `UnitCombatState`. It is built once
//! by the session and passed by reference to the systems that need unit
//! data; nothing registers itself globally.
//!
//! Storage is a slot vector with per-slot generations. Despawning bumps the
//! generation, so old `UnitId`s stop resolving even after the slot is reused.
//!
//! ## Example
//!
//! ```
//! use grid_tactics::core::{UnitCombatState, UnitRegistry};
//!
//! let mut registry = UnitRegistry::new();
//!
//! let id = registry.spawn(UnitCombatState::new("goblin_01", "Goblin"));
//! assert_eq!(registry.get(id).unwrap().name, "Goblin");
//!
//! registry.despawn(id);
//! assert!(registry.get(id).is_none());
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::unit::{UnitCombatState, UnitId};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    unit: Option<UnitCombatState>,
}

/// Registry of live units, addressed by generation-checked `UnitId`.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live ids per tag, oldest first.
    by_tag: FxHashMap<String, SmallVec<[UnitId; 1]>>,
}

impl UnitRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit and return its handle.
    ///
    /// Tags need not be unique; see [`find_by_tag`](Self::find_by_tag).
    pub fn spawn(&mut self, unit: UnitCombatState) -> UnitId {
        let tag = unit.tag.clone();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.unit = Some(unit);
                UnitId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    unit: Some(unit),
                });
                UnitId::new(index, 0)
            }
        };

        let ids = self.by_tag.entry(tag).or_default();
        if let Some(previous) = ids.last() {
            tracing::debug!(%previous, %id, "unit tag shared with a live unit");
        }
        ids.push(id);
        id
    }

    /// Remove a unit, returning its state.
    ///
    /// Returns `None` if the id is stale or unknown.
    pub fn despawn(&mut self, id: UnitId) -> Option<UnitCombatState> {
        let slot = self.slot_mut(id)?;
        let unit = slot.unit.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());

        if let Some(ids) = self.by_tag.get_mut(&unit.tag) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_tag.remove(&unit.tag);
            }
        }
        Some(unit)
    }

    /// Get a unit by id.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitCombatState> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.unit.as_ref())
    }

    /// Get a mutable unit by id.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitCombatState> {
        self.slot_mut(id).and_then(|slot| slot.unit.as_mut())
    }

    /// Check if an id still resolves to a live unit.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    /// Look a unit up by its authoring tag.
    ///
    /// When several live units share a tag, the most recently spawned one
    /// wins.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Option<UnitId> {
        self.by_tag
            .get(tag)?
            .iter()
            .rev()
            .copied()
            .find(|&id| self.contains(id))
    }

    /// Number of live units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Check if the registry has no live units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live units with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &UnitCombatState)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.unit
                .as_ref()
                .map(|unit| (UnitId::new(i as u32, slot.generation), unit))
        })
    }

    fn slot_mut(&mut self, id: UnitId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
    }
}
