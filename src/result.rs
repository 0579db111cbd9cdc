//! Result records.
//!
//! Every mutating operation returns the new actor snapshot together with
//! an immutable record of what changed. Records are plain serializable
//! values meant for audit logs and UI; they carry no identity beyond the
//! actor id.

use crate::actor::{Actor, ActorId};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Before and after values of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub before: f64,
    pub after: f64,
}

impl ResourceChange {
    pub fn new(before: f64, after: f64) -> Self {
        Self { before, after }
    }

    /// `after - before`; negative for losses.
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

/// Record of one combat action.
///
/// Resources the action did not touch are `None`.
///
/// # Examples
///
/// ```rust
/// use combat_core::{ActorId, CombatResult, Resource, ResourceChange};
///
/// let result = CombatResult::new(ActorId::from_str("npc:1"))
///     .with_change(Resource::Health, ResourceChange::new(100.0, 85.0));
///
/// assert_eq!(result.after(Resource::Health), Some(85.0));
/// assert_eq!(result.after(Resource::Stamina), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub actor: ActorId,
    pub health: Option<ResourceChange>,
    pub stamina: Option<ResourceChange>,
    pub tech_power: Option<ResourceChange>,
    pub armor: Option<ResourceChange>,
    pub message: Option<String>,
    pub is_incapacitated: bool,
}

impl CombatResult {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            health: None,
            stamina: None,
            tech_power: None,
            armor: None,
            message: None,
            is_incapacitated: false,
        }
    }

    pub fn with_change(mut self, resource: Resource, change: ResourceChange) -> Self {
        *self.slot_mut(resource) = Some(change);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_incapacitated(mut self, is_incapacitated: bool) -> Self {
        self.is_incapacitated = is_incapacitated;
        self
    }

    pub fn change(&self, resource: Resource) -> Option<ResourceChange> {
        match resource {
            Resource::Health => self.health,
            Resource::Stamina => self.stamina,
            Resource::TechPower => self.tech_power,
            Resource::Armor => self.armor,
        }
    }

    pub fn before(&self, resource: Resource) -> Option<f64> {
        self.change(resource).map(|c| c.before)
    }

    pub fn after(&self, resource: Resource) -> Option<f64> {
        self.change(resource).map(|c| c.after)
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut Option<ResourceChange> {
        match resource {
            Resource::Health => &mut self.health,
            Resource::Stamina => &mut self.stamina,
            Resource::TechPower => &mut self.tech_power,
            Resource::Armor => &mut self.armor,
        }
    }
}

/// Record of one restoration pass.
///
/// `elapsed_seconds` is the time that actually produced restoration: if
/// every pool capped before the interval ended it is shorter than
/// `requested_seconds`. Callers advancing a "last updated" clock should
/// use `requested_seconds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationResult {
    pub actor: ActorId,
    pub health_restored: f64,
    pub stamina_restored: f64,
    pub tech_power_restored: f64,
    pub armor_restored: f64,
    pub elapsed_seconds: f64,
    pub requested_seconds: f64,
}

impl RestorationResult {
    /// Nothing restored over `requested_seconds`.
    pub fn empty(actor: ActorId, requested_seconds: f64) -> Self {
        Self {
            actor,
            health_restored: 0.0,
            stamina_restored: 0.0,
            tech_power_restored: 0.0,
            armor_restored: 0.0,
            elapsed_seconds: 0.0,
            requested_seconds,
        }
    }

    pub fn restored(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Health => self.health_restored,
            Resource::Stamina => self.stamina_restored,
            Resource::TechPower => self.tech_power_restored,
            Resource::Armor => self.armor_restored,
        }
    }

    pub(crate) fn set_restored(&mut self, resource: Resource, amount: f64) {
        let slot = match resource {
            Resource::Health => &mut self.health_restored,
            Resource::Stamina => &mut self.stamina_restored,
            Resource::TechPower => &mut self.tech_power_restored,
            Resource::Armor => &mut self.armor_restored,
        };
        *slot = amount;
    }

    /// True if any resource moved by more than `tolerance`.
    pub fn has_changes(&self, tolerance: f64) -> bool {
        Resource::ALL
            .iter()
            .any(|r| self.restored(*r).abs() > tolerance)
    }
}

/// A new actor snapshot plus the record describing how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<R> {
    pub actor: Actor,
    pub result: R,
}

impl<R> Outcome<R> {
    pub fn new(actor: Actor, result: R) -> Self {
        Self { actor, result }
    }

    pub fn into_parts(self) -> (Actor, R) {
        (self.actor, self.result)
    }
}
