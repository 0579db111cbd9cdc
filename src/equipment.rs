//! Equipment effect calculation.
//!
//! Aggregates the effect fields of equipped item templates. Every
//! aggregate follows the same rule: additive fields are summed, multiplier
//! fields are multiplied, and an absent field contributes the neutral
//! value (0 or 1). The order of the item list never matters.

use crate::damage::DamageType;
use crate::error::CombatError;
use crate::modifier::{Modifier, ModifierTable};
use crate::resource::Resource;
use crate::stat::{BaseStats, Stat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Healing bonus key read by `EquipmentEffects::scale_healing`.
pub const HEAL_AMOUNT: &str = "heal_amount";

/// Per-resource regeneration modifier on an item template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerationModifier {
    pub bonus: Option<f64>,
    pub multiplier: Option<f64>,
}

/// Effect fields of a reusable item definition.
///
/// Only the fields that matter for combat math are modelled here; slot
/// rules, rarity and value belong to inventory management.
///
/// # Examples
///
/// ```rust
/// use combat_core::{ItemTemplate, Resource, Stat};
///
/// let json = r#"{
///     "name": "Reinforced Vest",
///     "stat_bonuses": {"DEX": 2.0},
///     "resource_bonuses": {"max_armor": 15.0},
///     "inventory_slots_bonus": 2
/// }"#;
/// let vest: ItemTemplate = serde_json::from_str(json).unwrap();
/// assert_eq!(vest.stat_bonuses[&Stat::Dexterity], 2.0);
/// assert_eq!(vest.resource_bonuses[&Resource::Armor], 15.0);
/// assert!(vest.damage_multipliers.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTemplate {
    pub name: String,
    pub stat_bonuses: BTreeMap<Stat, f64>,
    pub stat_multipliers: BTreeMap<Stat, f64>,
    pub resource_bonuses: BTreeMap<Resource, f64>,
    pub resource_regeneration_modifiers: BTreeMap<Resource, RegenerationModifier>,
    pub damage_bonuses: BTreeMap<DamageType, f64>,
    pub damage_multipliers: BTreeMap<DamageType, f64>,
    pub healing_bonuses: BTreeMap<String, f64>,
    pub inventory_slots_bonus: u32,
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stat_bonus(mut self, stat: Stat, bonus: f64) -> Self {
        self.stat_bonuses.insert(stat, bonus);
        self
    }

    pub fn with_stat_multiplier(mut self, stat: Stat, multiplier: f64) -> Self {
        self.stat_multipliers.insert(stat, multiplier);
        self
    }

    pub fn with_resource_bonus(mut self, resource: Resource, bonus: f64) -> Self {
        self.resource_bonuses.insert(resource, bonus);
        self
    }

    pub fn with_regeneration(
        mut self,
        resource: Resource,
        bonus: Option<f64>,
        multiplier: Option<f64>,
    ) -> Self {
        self.resource_regeneration_modifiers
            .insert(resource, RegenerationModifier { bonus, multiplier });
        self
    }

    pub fn with_damage_bonus(mut self, damage_type: DamageType, bonus: f64) -> Self {
        self.damage_bonuses.insert(damage_type, bonus);
        self
    }

    pub fn with_damage_multiplier(mut self, damage_type: DamageType, multiplier: f64) -> Self {
        self.damage_multipliers.insert(damage_type, multiplier);
        self
    }

    pub fn with_healing_bonus(mut self, key: impl Into<String>, bonus: f64) -> Self {
        self.healing_bonuses.insert(key.into(), bonus);
        self
    }

    pub fn with_inventory_slots(mut self, slots: u32) -> Self {
        self.inventory_slots_bonus = slots;
        self
    }
}

fn sum_by_key<'a, K, F>(items: &'a [ItemTemplate], field: F) -> BTreeMap<K, f64>
where
    K: Ord + Clone + 'a,
    F: Fn(&'a ItemTemplate) -> &'a BTreeMap<K, f64>,
{
    let mut totals = BTreeMap::new();
    for item in items {
        for (key, bonus) in field(item) {
            *totals.entry(key.clone()).or_insert(0.0) += bonus;
        }
    }
    totals
}

fn product_by_key<'a, K, F>(items: &'a [ItemTemplate], field: F) -> BTreeMap<K, f64>
where
    K: Ord + Clone + 'a,
    F: Fn(&'a ItemTemplate) -> &'a BTreeMap<K, f64>,
{
    let mut totals = BTreeMap::new();
    for item in items {
        for (key, multiplier) in field(item) {
            *totals.entry(key.clone()).or_insert(1.0) *= multiplier;
        }
    }
    totals
}

/// Summed stat bonuses, e.g. `{STR: 7.0, DEX: 3.0}`.
pub fn calculate_stat_bonuses(items: &[ItemTemplate]) -> BTreeMap<Stat, f64> {
    sum_by_key(items, |item| &item.stat_bonuses)
}

/// Multiplied stat multipliers, e.g. `{INT: 1.8}`.
pub fn calculate_stat_multipliers(items: &[ItemTemplate]) -> BTreeMap<Stat, f64> {
    product_by_key(items, |item| &item.stat_multipliers)
}

/// Summed bonuses to resource maxima.
pub fn calculate_resource_bonuses(items: &[ItemTemplate]) -> BTreeMap<Resource, f64> {
    sum_by_key(items, |item| &item.resource_bonuses)
}

pub fn calculate_damage_bonuses(items: &[ItemTemplate]) -> BTreeMap<DamageType, f64> {
    sum_by_key(items, |item| &item.damage_bonuses)
}

pub fn calculate_damage_multipliers(items: &[ItemTemplate]) -> BTreeMap<DamageType, f64> {
    product_by_key(items, |item| &item.damage_multipliers)
}

/// Summed healing bonuses. Healing has no multiplier.
pub fn calculate_healing_bonuses(items: &[ItemTemplate]) -> BTreeMap<String, f64> {
    sum_by_key(items, |item| &item.healing_bonuses)
}

pub fn get_inventory_slots_bonus(items: &[ItemTemplate]) -> u32 {
    items
        .iter()
        .fold(0u32, |total, item| total.saturating_add(item.inventory_slots_bonus))
}

/// Regeneration modifiers per resource, summed and multiplied across items.
pub(crate) fn calculate_regeneration_modifiers(items: &[ItemTemplate]) -> ModifierTable<Resource> {
    let mut table = ModifierTable::new();
    for item in items {
        for (resource, modifier) in &item.resource_regeneration_modifiers {
            if let Some(bonus) = modifier.bonus {
                table.add_bonus(*resource, bonus);
            }
            if let Some(multiplier) = modifier.multiplier {
                table.add_multiplier(*resource, multiplier);
            }
        }
    }
    table
}

fn table_from<K: Ord + Copy>(
    bonuses: BTreeMap<K, f64>,
    multipliers: BTreeMap<K, f64>,
) -> ModifierTable<K> {
    let mut table = ModifierTable::new();
    for (key, bonus) in bonuses {
        table.add_bonus(key, bonus);
    }
    for (key, multiplier) in multipliers {
        table.add_multiplier(key, multiplier);
    }
    table
}

/// Everything a set of equipped items contributes, aggregated once.
///
/// # Examples
///
/// ```rust
/// use combat_core::{DamageType, EquipmentEffects, ItemTemplate};
///
/// let items = vec![
///     ItemTemplate::new("Shock Baton").with_damage_bonus(DamageType::Tech, 4.0),
///     ItemTemplate::new("Overclock Chip").with_damage_multiplier(DamageType::Tech, 1.5),
/// ];
/// let effects = EquipmentEffects::from_items(&items);
///
/// // (10 + 4) × 1.5
/// assert_eq!(effects.scale_damage(10.0, DamageType::Tech), 21.0);
/// assert_eq!(effects.scale_damage(10.0, DamageType::Physical), 10.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEffects {
    pub stats: ModifierTable<Stat>,
    pub damage: ModifierTable<DamageType>,
    pub healing: BTreeMap<String, f64>,
    pub resources: BTreeMap<Resource, f64>,
    pub regeneration: ModifierTable<Resource>,
    pub inventory_slots: u32,
}

impl EquipmentEffects {
    pub fn from_items(items: &[ItemTemplate]) -> Self {
        Self {
            stats: table_from(
                calculate_stat_bonuses(items),
                calculate_stat_multipliers(items),
            ),
            damage: table_from(
                calculate_damage_bonuses(items),
                calculate_damage_multipliers(items),
            ),
            healing: calculate_healing_bonuses(items),
            resources: calculate_resource_bonuses(items),
            regeneration: calculate_regeneration_modifiers(items),
            inventory_slots: get_inventory_slots_bonus(items),
        }
    }

    /// `(base + Σbonus) × Πmultiplier` for one stat.
    ///
    /// Fails if the stat is missing from `stats`.
    pub fn effective_stat(&self, stats: &BaseStats, stat: Stat) -> Result<f64, CombatError> {
        let base = stats.get(stat)? as f64;
        Ok(self.stats.apply(stat, base))
    }

    /// Flat bonus to the maximum of `resource`.
    pub fn resource_bonus(&self, resource: Resource) -> f64 {
        self.resources.get(&resource).copied().unwrap_or(0.0)
    }

    /// Outgoing damage after equipment, floored at 0.
    pub fn scale_damage(&self, base: f64, damage_type: DamageType) -> f64 {
        self.damage.apply(damage_type, base).max(0.0)
    }

    /// Outgoing healing after the `"heal_amount"` bonus, floored at 0.
    pub fn scale_healing(&self, base: f64) -> f64 {
        let bonus = self.healing.get(HEAL_AMOUNT).copied().unwrap_or(0.0);
        Modifier::flat(bonus).apply(base).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_equipment_is_neutral() {
        assert!(calculate_stat_bonuses(&[]).is_empty());
        assert!(calculate_stat_multipliers(&[]).is_empty());
        assert_eq!(get_inventory_slots_bonus(&[]), 0);

        let effects = EquipmentEffects::from_items(&[]);
        assert_eq!(effects.scale_damage(12.0, DamageType::Physical), 12.0);
        assert_eq!(effects.scale_healing(12.0), 12.0);
        assert_eq!(effects.resource_bonus(Resource::Health), 0.0);
    }

    #[test]
    fn test_stat_bonuses_sum() {
        let items = vec![
            ItemTemplate::new("a")
                .with_stat_bonus(Stat::Strength, 5.0)
                .with_stat_bonus(Stat::Dexterity, 3.0),
            ItemTemplate::new("b")
                .with_stat_bonus(Stat::Strength, 2.0)
                .with_stat_bonus(Stat::Intelligence, 4.0),
            ItemTemplate::new("plain"),
        ];
        let bonuses = calculate_stat_bonuses(&items);
        assert_eq!(bonuses[&Stat::Strength], 7.0);
        assert_eq!(bonuses[&Stat::Dexterity], 3.0);
        assert_eq!(bonuses[&Stat::Intelligence], 4.0);
        assert!(!bonuses.contains_key(&Stat::Luck));
    }

    #[test]
    fn test_stat_multipliers_multiply() {
        let items = vec![
            ItemTemplate::new("a").with_stat_multiplier(Stat::Intelligence, 1.5),
            ItemTemplate::new("b").with_stat_multiplier(Stat::Intelligence, 1.2),
        ];
        let multipliers = calculate_stat_multipliers(&items);
        assert!((multipliers[&Stat::Intelligence] - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_resource_and_slot_bonuses() {
        let items = vec![
            ItemTemplate::new("pack")
                .with_resource_bonus(Resource::Health, 20.0)
                .with_inventory_slots(4),
            ItemTemplate::new("belt")
                .with_resource_bonus(Resource::Health, 15.0)
                .with_resource_bonus(Resource::Armor, 5.0)
                .with_inventory_slots(2),
        ];
        let bonuses = calculate_resource_bonuses(&items);
        assert_eq!(bonuses[&Resource::Health], 35.0);
        assert_eq!(bonuses[&Resource::Armor], 5.0);
        assert_eq!(get_inventory_slots_bonus(&items), 6);
    }

    #[test]
    fn test_damage_and_healing_aggregation() {
        let items = vec![
            ItemTemplate::new("a")
                .with_damage_bonus(DamageType::Physical, 10.0)
                .with_damage_multiplier(DamageType::Physical, 1.15)
                .with_healing_bonus(HEAL_AMOUNT, 5.0),
            ItemTemplate::new("b")
                .with_damage_bonus(DamageType::Physical, 2.0)
                .with_healing_bonus(HEAL_AMOUNT, 2.5),
        ];
        assert_eq!(calculate_damage_bonuses(&items)[&DamageType::Physical], 12.0);
        assert_eq!(calculate_damage_multipliers(&items)[&DamageType::Physical], 1.15);
        assert_eq!(calculate_healing_bonuses(&items)[HEAL_AMOUNT], 7.5);

        let effects = EquipmentEffects::from_items(&items);
        assert_eq!(effects.scale_healing(10.0), 17.5);
    }

    #[test]
    fn test_effective_stat_order() {
        let items = vec![ItemTemplate::new("gloves")
            .with_stat_bonus(Stat::Strength, 2.0)
            .with_stat_multiplier(Stat::Strength, 1.5)];
        let effects = EquipmentEffects::from_items(&items);
        let stats = BaseStats::new().with(Stat::Strength, 10).unwrap();
        // (10 + 2) × 1.5
        assert_eq!(effects.effective_stat(&stats, Stat::Strength).unwrap(), 18.0);
        assert!(effects.effective_stat(&stats, Stat::Luck).is_err());
    }

    #[test]
    fn test_regeneration_modifiers() {
        let items = vec![
            ItemTemplate::new("a").with_regeneration(Resource::Health, Some(0.5), Some(1.2)),
            ItemTemplate::new("b").with_regeneration(Resource::Health, None, Some(1.5)),
        ];
        let table = calculate_regeneration_modifiers(&items);
        let health = table.get(Resource::Health);
        assert_eq!(health.bonus, 0.5);
        assert!((health.multiplier - 1.8).abs() < 1e-9);
        assert!(table.get(Resource::Stamina).is_neutral());
    }
}
