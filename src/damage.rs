//! Damage and healing.
//!
//! `DamageProcessor` applies single combat events to an actor snapshot.
//! Routing depends on the damage type:
//!
//! - physical damage is absorbed by armor first, the overflow hits health
//! - tech damage ignores armor; tech power soaks up to
//!   `amount × tech_resistance_ratio` of it, spent one for one
//! - environmental damage goes straight to health
//!
//! Incapacitation is never stored: it is read from health on demand, so
//! healing above zero clears it without any extra bookkeeping.

use crate::actor::Actor;
use crate::config::DamageConfig;
use crate::equipment::EquipmentEffects;
use crate::error::{check_amount, CombatError};
use crate::resource::Resource;
use crate::result::{CombatResult, Outcome, ResourceChange};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Physical,
    Tech,
    Environmental,
}

impl DamageType {
    pub const ALL: [DamageType; 3] = [
        DamageType::Physical,
        DamageType::Tech,
        DamageType::Environmental,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DamageType::Physical => "physical",
            DamageType::Tech => "tech",
            DamageType::Environmental => "environmental",
        }
    }
}

impl FromStr for DamageType {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DamageType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CombatError::invalid(format!("unknown damage type: {s}")))
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display label for an actor's combat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStatus {
    Active,
    Incapacitated,
    Unconscious,
}

impl CombatStatus {
    /// Status of `actor`, given how many incapacitated turns mean unconscious.
    pub fn of(actor: &Actor, unconscious_after_turns: u32) -> Self {
        if !actor.is_incapacitated() {
            CombatStatus::Active
        } else if actor.turns_incapacitated() >= unconscious_after_turns {
            CombatStatus::Unconscious
        } else {
            CombatStatus::Incapacitated
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CombatStatus::Active => "ACTIVE",
            CombatStatus::Incapacitated => "INCAPACITATED",
            CombatStatus::Unconscious => "UNCONSCIOUS",
        }
    }
}

impl std::fmt::Display for CombatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// True iff the actor's health is at or below zero.
pub fn check_incapacitation(actor: &Actor) -> bool {
    actor.is_incapacitated()
}

/// Outgoing damage after equipment bonuses and multipliers.
///
/// `(base + Σdamage_bonus[type]) × Πdamage_multiplier[type]`, floored at 0.
pub fn scale_outgoing_damage(
    base: f64,
    damage_type: DamageType,
    equipment: &EquipmentEffects,
) -> Result<f64, CombatError> {
    let base = check_amount("damage", base)?;
    Ok(equipment.scale_damage(base, damage_type))
}

/// Outgoing healing after the `"heal_amount"` equipment bonus, floored at 0.
pub fn scale_healing(base: f64, equipment: &EquipmentEffects) -> Result<f64, CombatError> {
    let base = check_amount("healing", base)?;
    Ok(equipment.scale_healing(base))
}

/// Applies damage, healing and resource spending to actor snapshots.
///
/// # Examples
///
/// ```rust
/// use combat_core::{Actor, ActorKind, BaseStats, DamageProcessor, DamageType, Resource, ResourcePool};
///
/// let actor = Actor::new("npc:guard", ActorKind::Npc, 1, BaseStats::new())
///     .unwrap()
///     .with_pool(Resource::Health, ResourcePool::full(100.0).unwrap())
///     .with_pool(Resource::Armor, ResourcePool::full(20.0).unwrap());
///
/// let processor = DamageProcessor::default();
/// let outcome = processor.apply_damage(&actor, 35.0, DamageType::Physical).unwrap();
///
/// assert_eq!(outcome.actor.current(Resource::Armor), 0.0);
/// assert_eq!(outcome.actor.current(Resource::Health), 85.0);
/// assert_eq!(
///     outcome.result.message.as_deref(),
///     Some("Took 35.0 physical damage (20.0 to armor, 15.0 to health)")
/// );
/// // the input snapshot is untouched
/// assert_eq!(actor.current(Resource::Health), 100.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DamageProcessor {
    config: DamageConfig,
}

impl DamageProcessor {
    pub fn new(config: DamageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DamageConfig {
        &self.config
    }

    /// Combat status of `actor` under this processor's config.
    pub fn status(&self, actor: &Actor) -> CombatStatus {
        CombatStatus::of(actor, self.config.unconscious_after_turns)
    }

    /// Apply `amount` of damage of the given type.
    ///
    /// Fails with `NegativeAmount` for negative amounts and
    /// `InvalidActorState` for non-finite ones.
    pub fn apply_damage(
        &self,
        actor: &Actor,
        amount: f64,
        damage_type: DamageType,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        let amount = check_amount("damage", amount)?;
        let mut next = actor.clone();
        let mut result = CombatResult::new(actor.id().clone());

        let (shield, absorbed) = match damage_type {
            DamageType::Physical => {
                let absorbed = amount.min(actor.current(Resource::Armor));
                (Some(Resource::Armor), absorbed)
            }
            // a downed actor has no active tech defences
            DamageType::Tech if actor.is_incapacitated() => (None, 0.0),
            DamageType::Tech => {
                let soak = amount * self.config.tech_resistance_ratio;
                let absorbed = soak.min(actor.current(Resource::TechPower)).min(amount);
                (Some(Resource::TechPower), absorbed)
            }
            DamageType::Environmental => (None, 0.0),
        };
        let to_health = amount - absorbed;

        let mut message = format!("Took {amount:.1} {damage_type} damage");
        if let Some(shield) = shield {
            let before = actor.current(shield);
            let after = next.set_current(shield, before - absorbed);
            result = result.with_change(shield, ResourceChange::new(before, after));
            if before > 0.0 {
                message.push_str(&format!(
                    " ({:.1} to {shield}, {to_health:.1} to health)",
                    before - after
                ));
            }
        }

        let before_health = actor.current(Resource::Health);
        let after_health = next.set_current(Resource::Health, before_health - to_health);
        let result = result
            .with_change(
                Resource::Health,
                ResourceChange::new(before_health, after_health),
            )
            .with_message(message)
            .with_incapacitated(next.is_incapacitated());

        tracing::debug!(
            actor = %actor.id(),
            %damage_type,
            amount,
            absorbed,
            before_health,
            after_health,
            "applied damage"
        );
        if next.is_incapacitated() && !actor.is_incapacitated() {
            tracing::debug!(actor = %actor.id(), "actor incapacitated");
        }

        Ok(Outcome::new(next, result))
    }

    /// Restore health, capped at max. Healing above zero clears
    /// incapacitation and resets the incapacitated turn counter.
    pub fn apply_healing(
        &self,
        actor: &Actor,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        let amount = check_amount("healing", amount)?;
        let mut next = actor.clone();
        let before = actor.current(Resource::Health);
        let after = next.set_current(Resource::Health, before + amount);
        if !next.is_incapacitated() {
            next.set_turns_incapacitated(0);
        }

        tracing::debug!(actor = %actor.id(), amount, before, after, "applied healing");

        let result = CombatResult::new(actor.id().clone())
            .with_change(Resource::Health, ResourceChange::new(before, after))
            .with_message(format!("Healed {:.1} health", after - before))
            .with_incapacitated(next.is_incapacitated());
        Ok(Outcome::new(next, result))
    }

    /// Spend stamina. Never clamps: asking for more than is available fails.
    pub fn consume_stamina(
        &self,
        actor: &Actor,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        self.consume(actor, Resource::Stamina, amount)
    }

    /// Spend tech power. Never clamps: asking for more than is available fails.
    pub fn consume_tech_power(
        &self,
        actor: &Actor,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        self.consume(actor, Resource::TechPower, amount)
    }

    pub fn restore_stamina(
        &self,
        actor: &Actor,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        self.restore(actor, Resource::Stamina, amount)
    }

    pub fn restore_tech_power(
        &self,
        actor: &Actor,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        self.restore(actor, Resource::TechPower, amount)
    }

    /// Change armor by a signed `delta`, clamped to `[0, max_armor]`.
    pub fn update_armor(
        &self,
        actor: &Actor,
        delta: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        if !delta.is_finite() {
            return Err(CombatError::invalid(format!(
                "armor delta must be finite, got {delta}"
            )));
        }
        let mut next = actor.clone();
        let before = actor.current(Resource::Armor);
        let after = next.set_current(Resource::Armor, before + delta);
        let message = if delta > 0.0 {
            format!("Restored {:.1} armor", after - before)
        } else {
            format!("Lost {:.1} armor", before - after)
        };

        tracing::debug!(actor = %actor.id(), delta, before, after, "updated armor");

        let result = CombatResult::new(actor.id().clone())
            .with_change(Resource::Armor, ResourceChange::new(before, after))
            .with_message(message)
            .with_incapacitated(next.is_incapacitated());
        Ok(Outcome::new(next, result))
    }

    /// Close out a combat turn: count it if the actor is down, reset otherwise.
    pub fn end_turn(&self, actor: &Actor) -> Actor {
        let mut next = actor.clone();
        if actor.is_incapacitated() {
            next.set_turns_incapacitated(actor.turns_incapacitated().saturating_add(1));
            tracing::trace!(
                actor = %actor.id(),
                turns = next.turns_incapacitated(),
                status = %self.status(&next),
                "incapacitated turn ended"
            );
        } else {
            next.set_turns_incapacitated(0);
        }
        next
    }

    fn consume(
        &self,
        actor: &Actor,
        resource: Resource,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        let amount = check_amount("consumption", amount)?;
        if actor.is_incapacitated() {
            tracing::warn!(actor = %actor.id(), %resource, amount, "consumption while incapacitated");
            return Err(CombatError::Incapacitated(actor.id().clone()));
        }
        let available = actor.current(resource);
        if amount > available {
            tracing::warn!(
                actor = %actor.id(),
                %resource,
                requested = amount,
                available,
                "insufficient resource"
            );
            return Err(CombatError::InsufficientResource {
                resource,
                requested: amount,
                available,
            });
        }

        let mut next = actor.clone();
        let after = next.set_current(resource, available - amount);

        tracing::debug!(actor = %actor.id(), %resource, amount, before = available, after, "spent resource");

        let result = CombatResult::new(actor.id().clone())
            .with_change(resource, ResourceChange::new(available, after))
            .with_message(format!("Spent {amount:.1} {resource}"))
            .with_incapacitated(next.is_incapacitated());
        Ok(Outcome::new(next, result))
    }

    fn restore(
        &self,
        actor: &Actor,
        resource: Resource,
        amount: f64,
    ) -> Result<Outcome<CombatResult>, CombatError> {
        let amount = check_amount("restoration", amount)?;
        let mut next = actor.clone();
        let before = actor.current(resource);
        let after = next.set_current(resource, before + amount);

        tracing::debug!(actor = %actor.id(), %resource, amount, before, after, "restored resource");

        let result = CombatResult::new(actor.id().clone())
            .with_change(resource, ResourceChange::new(before, after))
            .with_message(format!("Restored {:.1} {resource}", after - before))
            .with_incapacitated(next.is_incapacitated());
        Ok(Outcome::new(next, result))
    }
}
