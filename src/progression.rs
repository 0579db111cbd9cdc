//! Experience and levelling.
//!
//! Reaching level `n` (for `n > 1`) takes `1000 × n²` total experience.
//! Each level gained is worth +2 to every stat; maxima are then
//! recomputed with `refresh_maxima`.

use crate::actor::Actor;
use crate::equipment::EquipmentEffects;
use crate::error::CombatError;
use crate::maxima::calculate_maxima;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};

/// Stat points added to every stat per level gained.
pub const STAT_GAIN_PER_LEVEL: i64 = 2;

/// Experience awarded for defeating an NPC.
///
/// Tougher NPCs pay a 10% bonus per level of difference; equal or weaker
/// ones pay a flat `50 × npc_level`. Never less than 1.
///
/// # Examples
///
/// ```rust
/// use combat_core::calculate_experience_reward;
///
/// assert_eq!(calculate_experience_reward(5, 3), 600);
/// assert_eq!(calculate_experience_reward(3, 5), 150);
/// assert_eq!(calculate_experience_reward(0, 5), 1);
/// ```
pub fn calculate_experience_reward(npc_level: u32, character_level: u32) -> u64 {
    let reward = if npc_level > character_level {
        let diff = f64::from(npc_level - character_level);
        (100.0 * f64::from(npc_level) * (1.0 + diff * 0.1)).floor() as u64
    } else {
        50 * u64::from(npc_level)
    };
    reward.max(1)
}

/// Total experience needed to reach `level`.
pub fn calculate_exp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let level = u64::from(level);
    level.saturating_mul(level).saturating_mul(1000)
}

/// Result of `add_experience`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUp {
    pub actor: Actor,
    pub previous_level: u32,
    pub levels_gained: u32,
}

impl LevelUp {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Add experience and raise the level as many times as it now allows.
///
/// Only level and experience change; call `apply_level_up` once per level
/// gained and then `refresh_maxima`.
pub fn add_experience(actor: &Actor, amount: u64) -> LevelUp {
    let mut next = actor.clone();
    let previous_level = actor.level();
    next.set_experience(actor.experience().saturating_add(amount));

    let reachable = u32::try_from(level_for_experience(next.experience())).unwrap_or(u32::MAX);
    if reachable > previous_level {
        next.set_level(reachable);
        tracing::debug!(
            actor = %next.id(),
            from = previous_level,
            level = reachable,
            "level up"
        );
    }

    LevelUp {
        levels_gained: next.level() - previous_level,
        previous_level,
        actor: next,
    }
}

/// Highest level whose threshold `experience` meets: `⌊√(experience / 1000)⌋`.
fn level_for_experience(experience: u64) -> u64 {
    let quota = experience / 1000;
    let mut level = (quota as f64).sqrt() as u64;
    // the float root can be off by one either way near 2^53
    while level.checked_mul(level).map_or(true, |square| square > quota) {
        level -= 1;
    }
    while (level + 1)
        .checked_mul(level + 1)
        .is_some_and(|square| square <= quota)
    {
        level += 1;
    }
    level.max(1)
}

/// +2 to every stat. Missing stats start from 0.
pub fn apply_level_up(actor: &Actor) -> Result<Actor, CombatError> {
    let mut next = actor.clone();
    let stats = next.stats_mut();
    for stat in Stat::ALL {
        let current = if stats.contains(stat) { stats.get(stat)? } else { 0 };
        stats.set(stat, current.saturating_add(STAT_GAIN_PER_LEVEL))?;
    }
    tracing::debug!(actor = %actor.id(), gain = STAT_GAIN_PER_LEVEL, "applied level-up stats");
    Ok(next)
}

/// Recompute maxima from current stats, level and class; clamp current values.
pub fn refresh_maxima(actor: &Actor, equipment: &EquipmentEffects) -> Result<Actor, CombatError> {
    let maxima = calculate_maxima(actor.stats(), actor.level(), actor.class(), equipment)?;
    Ok(actor.with_maxima(maxima))
}
