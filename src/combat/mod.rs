//! Seam for combat resolution.
//!
//! The engine decides *whether* a unit may attack and at what penalty; a
//! `CombatResolver` decides what happens. No concrete resolver ships with
//! the core.

pub mod resolver;
pub mod damage;

pub use resolver::{degree_of_success, AttackContext, AttackOutcome, CombatResolver};
pub use damage::DamageDice;
