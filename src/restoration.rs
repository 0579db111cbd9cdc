//! Resource restoration over time.
//!
//! Rates are per second. A base rate comes from stats, level and class;
//! equipment and buffs then modify it:
//!
//! ```text
//! rate = (base + bonus_equipment + bonus_buffs) × mult_equipment × mult_buffs
//! ```
//!
//! Restoring over an interval is linear in time and capped at each pool's
//! maximum, so restoring for `t1` and then `t2` gives the same result as
//! restoring once for `t1 + t2` as long as no pool fills up in between.

use crate::actor::Actor;
use crate::class::restoration_bonus;
use crate::config::RestorationConfig;
use crate::effects::Effects;
use crate::equipment::{calculate_regeneration_modifiers, ItemTemplate};
use crate::error::{check_amount, CombatError};
use crate::modifier::{Modifier, StackRule};
use crate::resource::Resource;
use crate::result::{Outcome, RestorationResult};
use crate::stat::Stat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restoration bonuses and multipliers from one source (equipment or buffs).
///
/// # Examples
///
/// ```rust
/// use combat_core::{Resource, RestorationModifiers};
///
/// let equipment = RestorationModifiers {
///     stamina_bonus: 0.5,
///     stamina_multiplier: 1.2,
///     ..RestorationModifiers::default()
/// };
/// let buffs = RestorationModifiers {
///     stamina_multiplier: 1.5,
///     ..RestorationModifiers::default()
/// };
///
/// let combined = equipment.combine(&buffs);
/// assert_eq!(combined.stamina_bonus, 0.5);
/// assert!((combined.stamina_multiplier - 1.8).abs() < 1e-9);
/// assert!(combined.for_resource(Resource::Health).is_neutral());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestorationModifiers {
    pub health_bonus: f64,
    pub health_multiplier: f64,
    pub stamina_bonus: f64,
    pub stamina_multiplier: f64,
    pub tech_power_bonus: f64,
    pub tech_power_multiplier: f64,
    pub armor_bonus: f64,
    pub armor_multiplier: f64,
}

impl Default for RestorationModifiers {
    fn default() -> Self {
        Self {
            health_bonus: 0.0,
            health_multiplier: 1.0,
            stamina_bonus: 0.0,
            stamina_multiplier: 1.0,
            tech_power_bonus: 0.0,
            tech_power_multiplier: 1.0,
            armor_bonus: 0.0,
            armor_multiplier: 1.0,
        }
    }
}

impl RestorationModifiers {
    /// Bonus and multiplier for one resource.
    pub fn for_resource(&self, resource: Resource) -> Modifier {
        match resource {
            Resource::Health => Modifier::new(self.health_bonus, self.health_multiplier),
            Resource::Stamina => Modifier::new(self.stamina_bonus, self.stamina_multiplier),
            Resource::TechPower => {
                Modifier::new(self.tech_power_bonus, self.tech_power_multiplier)
            }
            Resource::Armor => Modifier::new(self.armor_bonus, self.armor_multiplier),
        }
    }

    pub fn set_resource(&mut self, resource: Resource, modifier: Modifier) {
        let (bonus, multiplier) = match resource {
            Resource::Health => (&mut self.health_bonus, &mut self.health_multiplier),
            Resource::Stamina => (&mut self.stamina_bonus, &mut self.stamina_multiplier),
            Resource::TechPower => (&mut self.tech_power_bonus, &mut self.tech_power_multiplier),
            Resource::Armor => (&mut self.armor_bonus, &mut self.armor_multiplier),
        };
        *bonus = modifier.bonus;
        *multiplier = modifier.multiplier;
    }

    /// Stack one contribution onto `resource`.
    pub fn push(&mut self, resource: Resource, rule: StackRule, value: f64) {
        let mut modifier = self.for_resource(resource);
        modifier.push(rule, value);
        self.set_resource(resource, modifier);
    }

    /// Bonuses add, multipliers multiply.
    pub fn combine(&self, other: &RestorationModifiers) -> RestorationModifiers {
        let mut combined = RestorationModifiers::default();
        for resource in Resource::ALL {
            let stacked = self.for_resource(resource).stack(other.for_resource(resource));
            combined.set_resource(resource, stacked);
        }
        combined
    }
}

/// Per-second restoration rates. Always non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestorationRates {
    pub health_per_second: f64,
    pub stamina_per_second: f64,
    pub tech_power_per_second: f64,
    pub armor_per_second: f64,
}

fn clean_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}

impl RestorationRates {
    /// Rates with negative or non-finite values clamped to 0.
    pub fn new(health: f64, stamina: f64, tech_power: f64, armor: f64) -> Self {
        Self {
            health_per_second: clean_rate(health),
            stamina_per_second: clean_rate(stamina),
            tech_power_per_second: clean_rate(tech_power),
            armor_per_second: clean_rate(armor),
        }
    }

    /// Rate for one resource. Fields set directly or deserialized are
    /// read through the same clamp as `new`, so NaN reads as 0.
    pub fn rate(&self, resource: Resource) -> f64 {
        clean_rate(match resource {
            Resource::Health => self.health_per_second,
            Resource::Stamina => self.stamina_per_second,
            Resource::TechPower => self.tech_power_per_second,
            Resource::Armor => self.armor_per_second,
        })
    }

    fn from_fn(mut f: impl FnMut(Resource) -> f64) -> Self {
        Self::new(
            f(Resource::Health),
            f(Resource::Stamina),
            f(Resource::TechPower),
            f(Resource::Armor),
        )
    }
}

/// Regeneration modifiers of equipped items, aggregated.
pub fn calculate_equipment_restoration_modifiers(items: &[ItemTemplate]) -> RestorationModifiers {
    let table = calculate_regeneration_modifiers(items);
    let mut modifiers = RestorationModifiers::default();
    for (resource, modifier) in table.iter() {
        modifiers.set_resource(resource, modifier);
    }
    modifiers
}

/// Restoration modifiers from active effects.
///
/// Reads `"<resource>_restoration_bonus"` and
/// `"<resource>_restoration_multiplier"`; other keys and non-numeric
/// values are ignored.
pub fn calculate_buff_restoration_modifiers(effects: &Effects) -> RestorationModifiers {
    let mut modifiers = RestorationModifiers::default();
    for (resource, rule, value) in effects.restoration_entries() {
        modifiers.push(resource, rule, value);
    }
    modifiers
}

/// Final rates from base rates and both modifier sources.
pub fn calculate_restoration_rates(
    base: &RestorationRates,
    equipment: &RestorationModifiers,
    buffs: &RestorationModifiers,
) -> RestorationRates {
    let combined = equipment.combine(buffs);
    RestorationRates::from_fn(|resource| combined.for_resource(resource).apply(base.rate(resource)))
}

/// Computes and applies restoration.
///
/// # Examples
///
/// ```rust
/// use combat_core::{Actor, ActorKind, BaseStats, Resource, ResourcePool, RestorationRates, RestorationService};
///
/// let actor = Actor::new("character:3", ActorKind::Character, 1, BaseStats::new())
///     .unwrap()
///     .with_pool(Resource::Health, ResourcePool::full(100.0).unwrap())
///     .with_pool(Resource::Stamina, ResourcePool::new(90.0, 100.0).unwrap());
/// let rates = RestorationRates::new(0.0, 2.0, 0.0, 0.0);
///
/// let outcome = RestorationService::default()
///     .restore_resources(&actor, &rates, 30.0)
///     .unwrap();
///
/// assert_eq!(outcome.result.stamina_restored, 10.0);
/// assert_eq!(outcome.actor.current(Resource::Stamina), 100.0);
/// // stamina filled after 5 of the 30 seconds
/// assert_eq!(outcome.result.elapsed_seconds, 5.0);
/// assert_eq!(outcome.result.requested_seconds, 30.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RestorationService {
    config: RestorationConfig,
}

impl RestorationService {
    pub fn new(config: RestorationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RestorationConfig {
        &self.config
    }

    /// Base rates from base stats, level and class, before any modifiers.
    ///
    /// Fails if STR, DEX or INT is missing.
    pub fn base_rates(&self, actor: &Actor) -> Result<RestorationRates, CombatError> {
        let stats = actor.stats();
        let strength = stats.get(Stat::Strength)? as f64;
        let dexterity = stats.get(Stat::Dexterity)? as f64;
        let intelligence = stats.get(Stat::Intelligence)? as f64;
        let level = f64::from(actor.level());
        let class = |resource| restoration_bonus(actor.class(), resource, actor.level());

        Ok(RestorationRates::new(
            strength * 0.1 + level * 0.5 + class(Resource::Health),
            dexterity * 0.15 + strength * 0.05 + level * 0.3 + class(Resource::Stamina),
            intelligence * 0.2 + level * 0.4 + class(Resource::TechPower),
            dexterity * 0.05 + level * 0.2 + class(Resource::Armor),
        ))
    }

    /// Final rates for `actor` wearing `items` under `effects`.
    pub fn rates_for(
        &self,
        actor: &Actor,
        items: &[ItemTemplate],
        effects: &Effects,
    ) -> Result<RestorationRates, CombatError> {
        let base = self.base_rates(actor)?;
        let equipment = calculate_equipment_restoration_modifiers(items);
        let buffs = calculate_buff_restoration_modifiers(effects);
        let rates = calculate_restoration_rates(&base, &equipment, &buffs);
        tracing::trace!(actor = %actor.id(), ?base, ?rates, "computed restoration rates");
        Ok(rates)
    }

    /// Restore every resource for `elapsed_seconds`, capped at max.
    ///
    /// Incapacitated actors restore no stamina, tech power or armor, and
    /// health only at `rate × incapacitated_health_factor`.
    pub fn restore_resources(
        &self,
        actor: &Actor,
        rates: &RestorationRates,
        elapsed_seconds: f64,
    ) -> Result<Outcome<RestorationResult>, CombatError> {
        let elapsed = check_amount("restoration interval", elapsed_seconds)?;
        let incapacitated = actor.is_incapacitated();
        let mut next = actor.clone();
        let mut result = RestorationResult::empty(actor.id().clone(), elapsed);

        for resource in Resource::ALL {
            let rate = match (incapacitated, resource) {
                (false, _) => rates.rate(resource),
                (true, Resource::Health) => {
                    rates.rate(resource) * self.config.incapacitated_health_factor
                }
                (true, _) => 0.0,
            };
            if rate <= 0.0 {
                continue;
            }
            let missing = actor.pool(resource).missing();
            let restored = (rate * elapsed).min(missing);
            if restored <= 0.0 {
                continue;
            }
            next.set_current(resource, actor.current(resource) + restored);
            result.set_restored(resource, restored);
            let fill_time = (missing / rate).min(elapsed);
            result.elapsed_seconds = result.elapsed_seconds.max(fill_time);
        }

        if result.has_changes(self.config.change_tolerance) {
            tracing::debug!(
                actor = %actor.id(),
                requested = elapsed,
                applied = result.elapsed_seconds,
                health = result.health_restored,
                stamina = result.stamina_restored,
                tech_power = result.tech_power_restored,
                armor = result.armor_restored,
                "restored resources"
            );
        }

        Ok(Outcome::new(next, result))
    }

    /// Restoration owed between `last_update` and `now`.
    ///
    /// A `last_update` in the future counts as no time elapsed.
    pub fn catch_up_restoration(
        &self,
        actor: &Actor,
        rates: &RestorationRates,
        last_update: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Outcome<RestorationResult>, CombatError> {
        let elapsed = seconds_between(last_update, now);
        self.restore_resources(actor, rates, elapsed)
    }

    /// One restoration tick.
    ///
    /// Returns `Ok(None)` without doing anything if the actor is already
    /// full or less than `min_tick_seconds` has passed.
    pub fn tick(
        &self,
        actor: &Actor,
        rates: &RestorationRates,
        last_update: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<Outcome<RestorationResult>>, CombatError> {
        if actor.is_at_full_resources() {
            return Ok(None);
        }
        if seconds_between(last_update, now) < self.config.min_tick_seconds {
            return Ok(None);
        }
        self.catch_up_restoration(actor, rates, last_update, now)
            .map(Some)
    }
}

/// Seconds from `from` to `to` at nanosecond precision, never negative.
fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    let seconds = match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        // spans beyond ±292 years overflow i64 nanoseconds
        None => delta.num_milliseconds() as f64 / 1e3,
    };
    seconds.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;
    use crate::class::CharacterClass;
    use crate::resource::ResourcePool;
    use crate::stat::BaseStats;
    use chrono::Duration;

    fn actor(health: f64, stamina: f64) -> Actor {
        Actor::new("character:1", ActorKind::Character, 1, BaseStats::uniform(10).unwrap())
            .unwrap()
            .with_pool(Resource::Health, ResourcePool::new(health, 100.0).unwrap())
            .with_pool(Resource::Stamina, ResourcePool::new(stamina, 100.0).unwrap())
            .with_pool(Resource::TechPower, ResourcePool::new(0.0, 50.0).unwrap())
            .with_pool(Resource::Armor, ResourcePool::new(0.0, 20.0).unwrap())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_base_rates() {
        let service = RestorationService::default();
        let rates = service.base_rates(&actor(100.0, 100.0)).unwrap();
        assert!(approx(rates.health_per_second, 1.0 + 0.5));
        assert!(approx(rates.stamina_per_second, 1.5 + 0.5 + 0.3));
        assert!(approx(rates.tech_power_per_second, 2.0 + 0.4));
        assert!(approx(rates.armor_per_second, 0.5 + 0.2));
    }

    #[test]
    fn test_base_rates_include_class() {
        let service = RestorationService::default();
        let spy = actor(100.0, 100.0).with_class(Some(CharacterClass::Spy));
        let rates = service.base_rates(&spy).unwrap();
        assert!(approx(rates.stamina_per_second, 2.3 + 0.25));
        assert!(approx(rates.armor_per_second, 0.7));
    }

    #[test]
    fn test_base_rates_missing_stat() {
        let bare = Actor::new("npc:1", ActorKind::Npc, 1, BaseStats::new()).unwrap();
        assert!(RestorationService::default().base_rates(&bare).is_err());
    }

    #[test]
    fn test_rate_formula() {
        let base = RestorationRates::new(1.0, 2.0, 0.0, 0.0);
        let equipment = RestorationModifiers {
            health_bonus: 0.5,
            health_multiplier: 2.0,
            ..RestorationModifiers::default()
        };
        let buffs = RestorationModifiers {
            health_bonus: 0.5,
            health_multiplier: 1.5,
            stamina_multiplier: 0.5,
            ..RestorationModifiers::default()
        };
        let rates = calculate_restoration_rates(&base, &equipment, &buffs);
        // (1 + 0.5 + 0.5) × 2 × 1.5
        assert!(approx(rates.health_per_second, 6.0));
        assert!(approx(rates.stamina_per_second, 1.0));
    }

    #[test]
    fn test_negative_rates_clamped() {
        let base = RestorationRates::new(1.0, 0.0, 0.0, 0.0);
        let buffs = RestorationModifiers {
            health_bonus: -5.0,
            ..RestorationModifiers::default()
        };
        let rates = calculate_restoration_rates(&base, &RestorationModifiers::default(), &buffs);
        assert_eq!(rates.health_per_second, 0.0);
    }

    #[test]
    fn test_buff_modifiers_from_effects() {
        let effects = Effects::new()
            .with("health_restoration_bonus", 0.25)
            .with("tech_power_restoration_multiplier", 2.0)
            .with("armor_restoration_multiplier", "broken")
            .with("blessed", true);
        let modifiers = calculate_buff_restoration_modifiers(&effects);
        assert_eq!(modifiers.health_bonus, 0.25);
        assert_eq!(modifiers.tech_power_multiplier, 2.0);
        assert_eq!(modifiers.armor_multiplier, 1.0);
    }

    #[test]
    fn test_equipment_modifiers_from_items() {
        let items = vec![
            ItemTemplate::new("band").with_regeneration(Resource::Stamina, Some(0.5), None),
            ItemTemplate::new("rig").with_regeneration(Resource::Stamina, Some(0.25), Some(1.2)),
        ];
        let modifiers = calculate_equipment_restoration_modifiers(&items);
        assert_eq!(modifiers.stamina_bonus, 0.75);
        assert!(approx(modifiers.stamina_multiplier, 1.2));
        assert_eq!(modifiers.health_multiplier, 1.0);
    }

    #[test]
    fn test_restore_caps_at_max() {
        let service = RestorationService::default();
        let rates = RestorationRates::new(1.0, 2.0, 0.0, 0.0);
        let outcome = service.restore_resources(&actor(50.0, 90.0), &rates, 30.0).unwrap();
        assert_eq!(outcome.result.health_restored, 30.0);
        assert_eq!(outcome.result.stamina_restored, 10.0);
        assert_eq!(outcome.actor.current(Resource::Stamina), 100.0);
        assert_eq!(outcome.result.elapsed_seconds, 30.0);
    }

    #[test]
    fn test_incapacitated_restoration_is_gated() {
        let service = RestorationService::default();
        let rates = RestorationRates::new(1.0, 2.0, 1.0, 1.0);
        let outcome = service.restore_resources(&actor(0.0, 10.0), &rates, 10.0).unwrap();
        assert_eq!(outcome.result.stamina_restored, 0.0);
        assert_eq!(outcome.result.health_restored, 0.0);
        assert_eq!(outcome.result.armor_restored, 0.0);
        assert!(!outcome.result.has_changes(0.01));
        assert!(outcome.actor.is_incapacitated());
    }

    #[test]
    fn test_incapacitated_health_factor() {
        let service = RestorationService::new(RestorationConfig {
            incapacitated_health_factor: 0.5,
            ..RestorationConfig::default()
        });
        let rates = RestorationRates::new(1.0, 2.0, 0.0, 0.0);
        let outcome = service.restore_resources(&actor(0.0, 10.0), &rates, 10.0).unwrap();
        assert_eq!(outcome.result.health_restored, 5.0);
        assert_eq!(outcome.result.stamina_restored, 0.0);
        assert!(!outcome.actor.is_incapacitated());
    }

    #[test]
    fn test_invalid_interval() {
        let service = RestorationService::default();
        let rates = RestorationRates::default();
        assert!(matches!(
            service.restore_resources(&actor(50.0, 50.0), &rates, -1.0),
            Err(CombatError::NegativeAmount { .. })
        ));
        assert!(service.restore_resources(&actor(50.0, 50.0), &rates, f64::NAN).is_err());
    }

    #[test]
    fn test_catch_up_uses_timestamps() {
        let service = RestorationService::default();
        let rates = RestorationRates::new(0.0, 2.0, 0.0, 0.0);
        let now = Utc::now();
        let outcome = service
            .catch_up_restoration(&actor(100.0, 50.0), &rates, now - Duration::seconds(10), now)
            .unwrap();
        assert_eq!(outcome.result.stamina_restored, 20.0);
        assert_eq!(outcome.result.requested_seconds, 10.0);
    }

    #[test]
    fn test_catch_up_future_timestamp() {
        let service = RestorationService::default();
        let rates = RestorationRates::new(0.0, 2.0, 0.0, 0.0);
        let now = Utc::now();
        let outcome = service
            .catch_up_restoration(&actor(100.0, 50.0), &rates, now + Duration::seconds(60), now)
            .unwrap();
        assert_eq!(outcome.result.requested_seconds, 0.0);
        assert_eq!(outcome.result.stamina_restored, 0.0);
    }

    #[test]
    fn test_tick_skips() {
        let service = RestorationService::default();
        let rates = RestorationRates::new(1.0, 1.0, 1.0, 1.0);
        let now = Utc::now();

        let too_soon = service
            .tick(&actor(50.0, 50.0), &rates, now - Duration::milliseconds(500), now)
            .unwrap();
        assert!(too_soon.is_none());

        let full = Actor::new("npc:1", ActorKind::Npc, 1, BaseStats::new())
            .unwrap()
            .with_pool(Resource::Health, ResourcePool::full(10.0).unwrap());
        let idle = service
            .tick(&full, &rates, now - Duration::seconds(5), now)
            .unwrap();
        assert!(idle.is_none());

        let ticked = service
            .tick(&actor(50.0, 50.0), &rates, now - Duration::seconds(1), now)
            .unwrap()
            .unwrap();
        assert_eq!(ticked.result.health_restored, 1.0);
    }

    #[test]
    fn test_non_finite_rate_restores_nothing() {
        let service = RestorationService::default();
        let rates = RestorationRates {
            stamina_per_second: f64::NAN,
            health_per_second: f64::INFINITY,
            ..RestorationRates::default()
        };
        assert_eq!(rates.rate(Resource::Stamina), 0.0);

        let outcome = service.restore_resources(&actor(50.0, 0.0), &rates, 1.0).unwrap();
        assert_eq!(outcome.result.stamina_restored, 0.0);
        assert_eq!(outcome.result.health_restored, 0.0);
        assert_eq!(outcome.actor.current(Resource::Stamina), 0.0);
    }

    #[test]
    fn test_deserialized_negative_rate_reads_as_zero() {
        let rates: RestorationRates =
            serde_json::from_str(r#"{"stamina_per_second": -3.0, "armor_per_second": 0.5}"#)
                .unwrap();
        assert_eq!(rates.rate(Resource::Stamina), 0.0);
        assert_eq!(rates.rate(Resource::Armor), 0.5);
    }

    #[test]
    fn test_seconds_between_keeps_sub_millisecond_precision() {
        let start = Utc::now();
        let later = start + Duration::microseconds(1_000_900);
        assert!((seconds_between(start, later) - 1.0009).abs() < 1e-12);
        assert_eq!(seconds_between(later, start), 0.0);
    }

    #[test]
    fn test_ticks_at_uneven_step_match_catch_up() {
        let service = RestorationService::default();
        let rates = RestorationRates::new(0.0, 1000.0, 0.0, 0.0);
        let start = Utc::now();
        let step = Duration::microseconds(1_000_900);
        let fresh = || {
            actor(100.0, 0.0)
                .with_pool(Resource::Stamina, ResourcePool::new(0.0, 1_000_000.0).unwrap())
        };

        let mut ticking = fresh();
        let mut last = start;
        for _ in 0..100 {
            let now = last + step;
            let outcome = service.tick(&ticking, &rates, last, now).unwrap().unwrap();
            ticking = outcome.actor;
            last = now;
        }

        let caught_up = service
            .catch_up_restoration(&fresh(), &rates, start, last)
            .unwrap();

        assert!((caught_up.actor.current(Resource::Stamina) - 100_090.0).abs() < 1e-6);
        assert!(
            (ticking.current(Resource::Stamina) - caught_up.actor.current(Resource::Stamina)).abs()
                < 1e-6
        );
    }
}
