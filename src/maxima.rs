//! Resource maxima.
//!
//! Maximum health, stamina, tech power and armor are derived from
//! effective stats (base stats after equipment), level, class and the
//! flat resource bonuses on equipment:
//!
//! ```text
//! health     = STR×8 + DEX×2 + level×10 + class + bonus
//! stamina    = DEX×5 + STR×2 + level×5  + class + bonus
//! tech power = INT×10        + level×8  + class + bonus
//! armor      = DEX×3         + level×2          + bonus
//! ```
//!
//! Results are clamped to be non-negative.

use crate::class::{pool_bonus, CharacterClass};
use crate::equipment::EquipmentEffects;
use crate::error::CombatError;
use crate::resource::Resource;
use crate::stat::{BaseStats, Stat};
use serde::{Deserialize, Serialize};

/// The four derived maxima.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMaxima {
    pub health: f64,
    pub stamina: f64,
    pub tech_power: f64,
    pub armor: f64,
}

impl ResourceMaxima {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Health => self.health,
            Resource::Stamina => self.stamina,
            Resource::TechPower => self.tech_power,
            Resource::Armor => self.armor,
        }
    }
}

/// Stat weights and per-level amount for one resource.
struct Formula {
    weights: &'static [(Stat, f64)],
    per_level: f64,
}

fn formula(resource: Resource) -> Formula {
    match resource {
        Resource::Health => Formula {
            weights: &[(Stat::Strength, 8.0), (Stat::Dexterity, 2.0)],
            per_level: 10.0,
        },
        Resource::Stamina => Formula {
            weights: &[(Stat::Dexterity, 5.0), (Stat::Strength, 2.0)],
            per_level: 5.0,
        },
        Resource::TechPower => Formula {
            weights: &[(Stat::Intelligence, 10.0)],
            per_level: 8.0,
        },
        Resource::Armor => Formula {
            weights: &[(Stat::Dexterity, 3.0)],
            per_level: 2.0,
        },
    }
}

fn calculate_max(
    resource: Resource,
    stats: &BaseStats,
    level: u32,
    class: Option<CharacterClass>,
    equipment: &EquipmentEffects,
) -> Result<f64, CombatError> {
    if level == 0 {
        return Err(CombatError::invalid("level must be at least 1"));
    }
    let formula = formula(resource);
    let mut total = formula.per_level * f64::from(level);
    for (stat, weight) in formula.weights {
        total += equipment.effective_stat(stats, *stat)? * weight;
    }
    total += pool_bonus(class, resource, level);
    total += equipment.resource_bonus(resource);
    Ok(total.max(0.0))
}

/// Maximum health.
///
/// # Examples
///
/// ```rust
/// use combat_core::{calculate_max_health, BaseStats, CharacterClass, EquipmentEffects, Stat};
///
/// let stats = BaseStats::from_pairs([("STR", 12), ("DEX", 10)]).unwrap();
/// let none = EquipmentEffects::default();
///
/// // 12×8 + 10×2 + 3×10
/// assert_eq!(calculate_max_health(&stats, 3, None, &none).unwrap(), 146.0);
/// // + Enforcer 50 + 5×3
/// assert_eq!(
///     calculate_max_health(&stats, 3, Some(CharacterClass::Enforcer), &none).unwrap(),
///     211.0
/// );
/// ```
pub fn calculate_max_health(
    stats: &BaseStats,
    level: u32,
    class: Option<CharacterClass>,
    equipment: &EquipmentEffects,
) -> Result<f64, CombatError> {
    calculate_max(Resource::Health, stats, level, class, equipment)
}

pub fn calculate_max_stamina(
    stats: &BaseStats,
    level: u32,
    class: Option<CharacterClass>,
    equipment: &EquipmentEffects,
) -> Result<f64, CombatError> {
    calculate_max(Resource::Stamina, stats, level, class, equipment)
}

pub fn calculate_max_tech_power(
    stats: &BaseStats,
    level: u32,
    class: Option<CharacterClass>,
    equipment: &EquipmentEffects,
) -> Result<f64, CombatError> {
    calculate_max(Resource::TechPower, stats, level, class, equipment)
}

/// Maximum armor. Classes do not contribute armor.
pub fn calculate_max_armor(
    stats: &BaseStats,
    level: u32,
    class: Option<CharacterClass>,
    equipment: &EquipmentEffects,
) -> Result<f64, CombatError> {
    calculate_max(Resource::Armor, stats, level, class, equipment)
}

/// All four maxima at once.
pub fn calculate_maxima(
    stats: &BaseStats,
    level: u32,
    class: Option<CharacterClass>,
    equipment: &EquipmentEffects,
) -> Result<ResourceMaxima, CombatError> {
    Ok(ResourceMaxima {
        health: calculate_max_health(stats, level, class, equipment)?,
        stamina: calculate_max_stamina(stats, level, class, equipment)?,
        tech_power: calculate_max_tech_power(stats, level, class, equipment)?,
        armor: calculate_max_armor(stats, level, class, equipment)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::ItemTemplate;

    fn stats() -> BaseStats {
        BaseStats::from_pairs([("STR", 10), ("DEX", 8), ("INT", 14)]).unwrap()
    }

    #[test]
    fn test_base_formulas() {
        let none = EquipmentEffects::default();
        let maxima = calculate_maxima(&stats(), 2, None, &none).unwrap();
        assert_eq!(maxima.health, 10.0 * 8.0 + 8.0 * 2.0 + 20.0);
        assert_eq!(maxima.stamina, 8.0 * 5.0 + 10.0 * 2.0 + 10.0);
        assert_eq!(maxima.tech_power, 140.0 + 16.0);
        assert_eq!(maxima.armor, 24.0 + 4.0);
    }

    #[test]
    fn test_class_contribution() {
        let none = EquipmentEffects::default();
        let wizard = calculate_maxima(&stats(), 2, Some(CharacterClass::TechWizard), &none).unwrap();
        // 156 + 50 + 10×2
        assert_eq!(wizard.tech_power, 226.0);
        assert_eq!(wizard.armor, 28.0);
    }

    #[test]
    fn test_equipment_contribution() {
        let items = vec![
            ItemTemplate::new("vest")
                .with_stat_bonus(Stat::Dexterity, 2.0)
                .with_resource_bonus(Resource::Armor, 15.0),
            ItemTemplate::new("implant").with_stat_multiplier(Stat::Intelligence, 1.5),
        ];
        let equipment = EquipmentEffects::from_items(&items);
        let maxima = calculate_maxima(&stats(), 1, None, &equipment).unwrap();
        // (8 + 2)×3 + 2 + 15
        assert_eq!(maxima.armor, 47.0);
        // 14×1.5×10 + 8
        assert_eq!(maxima.tech_power, 218.0);
    }

    #[test]
    fn test_negative_bonus_clamps_to_zero() {
        let items = vec![ItemTemplate::new("cursed").with_resource_bonus(Resource::Armor, -500.0)];
        let equipment = EquipmentEffects::from_items(&items);
        assert_eq!(calculate_max_armor(&stats(), 1, None, &equipment).unwrap(), 0.0);
    }

    #[test]
    fn test_level_zero_rejected() {
        let err = calculate_maxima(&stats(), 0, None, &EquipmentEffects::default()).unwrap_err();
        assert!(matches!(err, CombatError::InvalidActorState(_)));
    }

    #[test]
    fn test_missing_stat_rejected() {
        let partial = BaseStats::from_pairs([("STR", 10)]).unwrap();
        let none = EquipmentEffects::default();
        assert!(calculate_max_health(&partial, 1, None, &none).is_err());
        assert!(calculate_max_tech_power(&partial, 1, None, &none).is_err());
    }

    #[test]
    fn test_monotonic_in_level() {
        let none = EquipmentEffects::default();
        for class in [None, Some(CharacterClass::Enforcer), Some(CharacterClass::TechWizard)] {
            let mut previous = calculate_maxima(&stats(), 1, class, &none).unwrap();
            for level in 2..=20 {
                let next = calculate_maxima(&stats(), level, class, &none).unwrap();
                for resource in Resource::ALL {
                    assert!(next.get(resource) >= previous.get(resource));
                }
                previous = next;
            }
        }
    }
}
