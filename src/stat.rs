//! Base stats.
//!
//! Actors carry six base stats. The set is closed, so `Stat` is an enum;
//! the string abbreviations used by the persistence layer are parsed at
//! the boundary and unknown keys are rejected instead of being ignored.

use crate::error::CombatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// One of the six base stats.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "CHA")]
    Charisma,
    #[serde(rename = "PER")]
    Perception,
    #[serde(rename = "LUK")]
    Luck,
}

impl Stat {
    /// All six stats.
    pub const ALL: [Stat; 6] = [
        Stat::Strength,
        Stat::Dexterity,
        Stat::Intelligence,
        Stat::Charisma,
        Stat::Perception,
        Stat::Luck,
    ];

    /// Three-letter abbreviation, e.g. `"STR"`.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Stat::Strength => "STR",
            Stat::Dexterity => "DEX",
            Stat::Intelligence => "INT",
            Stat::Charisma => "CHA",
            Stat::Perception => "PER",
            Stat::Luck => "LUK",
        }
    }
}

impl FromStr for Stat {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.abbreviation() == s)
            .ok_or_else(|| CombatError::invalid(format!("unknown stat key: {s}")))
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// An actor's base stats, keyed by `Stat`.
///
/// Values are non-negative. Characters start in `[1, 20]`; NPCs and
/// levelled characters may go higher, so no upper bound is enforced.
/// A stat may be absent from the map; reading it with `get` then fails
/// with `InvalidActorState` so broken records surface instead of
/// producing nonsensical maxima.
///
/// # Examples
///
/// ```rust
/// use combat_core::{BaseStats, Stat};
///
/// let stats = BaseStats::from_pairs([("STR", 12), ("DEX", 9)]).unwrap();
/// assert_eq!(stats.get(Stat::Strength).unwrap(), 12);
/// assert!(stats.get(Stat::Intelligence).is_err());
///
/// assert!(BaseStats::from_pairs([("FOO", 3)]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct BaseStats {
    values: BTreeMap<Stat, i64>,
}

impl BaseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stat set to `value`.
    pub fn uniform(value: i64) -> Result<Self, CombatError> {
        Self::from_pairs(Stat::ALL.map(|stat| (stat.abbreviation(), value)))
    }

    /// Build from `(abbreviation, value)` pairs.
    ///
    /// Fails on an unknown abbreviation or a negative value.
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self, CombatError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, i64)>,
    {
        let mut stats = Self::new();
        for (key, value) in pairs {
            let stat = key.as_ref().parse::<Stat>()?;
            stats.set(stat, value)?;
        }
        Ok(stats)
    }

    /// Builder-style `set`.
    pub fn with(mut self, stat: Stat, value: i64) -> Result<Self, CombatError> {
        self.set(stat, value)?;
        Ok(self)
    }

    pub fn set(&mut self, stat: Stat, value: i64) -> Result<(), CombatError> {
        if value < 0 {
            return Err(CombatError::invalid(format!(
                "stat {stat} must be non-negative, got {value}"
            )));
        }
        self.values.insert(stat, value);
        Ok(())
    }

    /// Read a stat, failing if it is missing.
    pub fn get(&self, stat: Stat) -> Result<i64, CombatError> {
        self.values
            .get(&stat)
            .copied()
            .ok_or_else(|| CombatError::invalid(format!("missing stat: {stat}")))
    }

    pub fn contains(&self, stat: Stat) -> bool {
        self.values.contains_key(&stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i64)> + '_ {
        self.values.iter().map(|(stat, value)| (*stat, *value))
    }
}

impl TryFrom<BTreeMap<String, i64>> for BaseStats {
    type Error = CombatError;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        Self::from_pairs(map)
    }
}

impl From<BaseStats> for BTreeMap<String, i64> {
    fn from(stats: BaseStats) -> Self {
        stats
            .values
            .into_iter()
            .map(|(stat, value)| (stat.abbreviation().to_string(), value))
            .collect()
    }
}
