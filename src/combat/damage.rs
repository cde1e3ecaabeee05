//! Weapon damage expressions (`XdY+Z`).

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Parsed damage expression: `count` dice of `sides` faces plus `bonus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageDice {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl DamageDice {
    /// Parse `XdY`, `XdY+Z` or `XdY-Z`. Returns `None` on malformed input.
    ///
    /// ```
    /// use grid_tactics::combat::DamageDice;
    ///
    /// let dice = DamageDice::parse("2d8+3").unwrap();
    /// assert_eq!((dice.count, dice.sides, dice.bonus), (2, 8, 3));
    /// assert!(DamageDice::parse("d8").is_none());
    /// ```
    #[must_use]
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        let (count, rest) = expr.split_once(['d', 'D'])?;
        let count = count.parse().ok()?;

        let (sides, bonus) = match rest.find(['+', '-']) {
            Some(i) => {
                let (sides, bonus) = rest.split_at(i);
                let magnitude: i32 = bonus[1..].parse().ok()?;
                (sides, if bonus.starts_with('-') { -magnitude } else { magnitude })
            }
            None => (rest, 0),
        };
        let sides = sides.parse().ok()?;

        (count > 0 && sides > 0).then_some(Self { count, sides, bonus })
    }

    /// Roll the dice and add the bonus. Damage never goes below zero.
    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        (rng.roll_dice(self.count, self.sides) + self.bonus).max(0)
    }

    #[must_use]
    pub fn min(&self) -> i32 {
        (self.count as i32 + self.bonus).max(0)
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        (self.count as i32 * self.sides as i32 + self.bonus).max(0)
    }
}

impl std::fmt::Display for DamageDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.bonus {
            0 => write!(f, "{}d{}", self.count, self.sides),
            b if b > 0 => write!(f, "{}d{}+{}", self.count, self.sides, b),
            b => write!(f, "{}d{}{}", self.count, self.sides, b),
        }
    }
}
