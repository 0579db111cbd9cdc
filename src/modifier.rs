//! Modifier stacking.
//!
//! Equipment, buffs and class profiles all contribute to a number through
//! the same two operations: additive bonuses and multiplicative factors.
//! Every consumer in this crate (maxima, damage scaling, restoration
//! rates) goes through `Modifier::apply`, so the order is fixed in one
//! place:
//!
//! ```text
//! effective = (base + Σbonus) × Πmultiplier
//! ```
//!
//! Bonuses always stack before multipliers, never the reverse. Because
//! addition and multiplication are commutative, the order in which
//! modifiers are collected does not change the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Sum;

/// How a single contribution stacks with others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackRule {
    /// Summed into the bonus.
    Additive,
    /// Multiplied into the multiplier.
    Multiplicative,
}

/// An aggregated additive bonus and multiplicative factor.
///
/// The neutral modifier is `bonus = 0.0, multiplier = 1.0`; a missing
/// contribution is always neutral, never "nothing equipped".
///
/// # Examples
///
/// ```rust
/// use combat_core::Modifier;
///
/// let ring = Modifier::new(5.0, 1.2);
/// let amulet = Modifier::new(3.0, 1.5);
///
/// let stacked = ring.stack(amulet);
/// assert_eq!(stacked.bonus, 8.0);
/// // (10 + 5 + 3) × 1.2 × 1.5
/// assert!((stacked.apply(10.0) - 32.4).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifier {
    pub bonus: f64,
    pub multiplier: f64,
}

impl Default for Modifier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Modifier {
    /// Contributes nothing.
    pub const NEUTRAL: Modifier = Modifier {
        bonus: 0.0,
        multiplier: 1.0,
    };

    pub fn new(bonus: f64, multiplier: f64) -> Self {
        Self { bonus, multiplier }
    }

    /// Flat bonus with a neutral multiplier.
    pub fn flat(bonus: f64) -> Self {
        Self::new(bonus, 1.0)
    }

    /// Multiplier with no flat bonus.
    pub fn scale(multiplier: f64) -> Self {
        Self::new(0.0, multiplier)
    }

    /// Fold one contribution in according to its stack rule.
    pub fn push(&mut self, rule: StackRule, value: f64) {
        match rule {
            StackRule::Additive => self.bonus += value,
            StackRule::Multiplicative => self.multiplier *= value,
        }
    }

    /// Combine two modifiers: bonuses add, multipliers multiply.
    pub fn stack(self, other: Modifier) -> Modifier {
        Modifier {
            bonus: self.bonus + other.bonus,
            multiplier: self.multiplier * other.multiplier,
        }
    }

    /// Apply to a base value: `(base + bonus) × multiplier`.
    #[inline]
    pub fn apply(self, base: f64) -> f64 {
        (base + self.bonus) * self.multiplier
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

impl Sum for Modifier {
    fn sum<I: Iterator<Item = Modifier>>(iter: I) -> Self {
        iter.fold(Modifier::NEUTRAL, Modifier::stack)
    }
}

impl<'a> Sum<&'a Modifier> for Modifier {
    fn sum<I: Iterator<Item = &'a Modifier>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Modifiers keyed by what they modify (a stat, a damage type, ...).
///
/// Keys that were never touched read as `Modifier::NEUTRAL`. Backed by a
/// `BTreeMap` so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Ord + Serialize",
    deserialize = "K: Ord + Deserialize<'de>"
))]
pub struct ModifierTable<K: Ord> {
    entries: BTreeMap<K, Modifier>,
}

impl<K: Ord> Default for ModifierTable<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> ModifierTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: K, rule: StackRule, value: f64) {
        self.entries.entry(key).or_default().push(rule, value);
    }

    pub fn add_bonus(&mut self, key: K, bonus: f64) {
        self.push(key, StackRule::Additive, bonus);
    }

    pub fn add_multiplier(&mut self, key: K, multiplier: f64) {
        self.push(key, StackRule::Multiplicative, multiplier);
    }

    pub fn get(&self, key: K) -> Modifier {
        self.entries.get(&key).copied().unwrap_or_default()
    }

    /// `(base + bonus[key]) × multiplier[key]`.
    pub fn apply(&self, key: K, base: f64) -> f64 {
        self.get(key).apply(base)
    }

    /// Stack every entry of `other` into this table.
    pub fn merge(&mut self, other: &ModifierTable<K>) {
        for (key, modifier) in &other.entries {
            let entry = self.entries.entry(*key).or_default();
            *entry = entry.stack(*modifier);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, Modifier)> + '_ {
        self.entries.iter().map(|(key, modifier)| (*key, *modifier))
    }
}
