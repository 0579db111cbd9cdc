//! Player-facing formatting.
//!
//! Values are truncated toward zero, never rounded: 42.9 health shows as 42.

use crate::actor::Actor;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Integer view of an actor's resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDisplay {
    pub current_health: i64,
    pub max_health: i64,
    pub current_stamina: i64,
    pub max_stamina: i64,
    pub current_tech_power: i64,
    pub max_tech_power: i64,
    pub current_armor: i64,
    pub max_armor: i64,
    pub is_incapacitated: bool,
}

impl ResourceDisplay {
    /// `(current, max)` for one resource.
    pub fn get(&self, resource: Resource) -> (i64, i64) {
        match resource {
            Resource::Health => (self.current_health, self.max_health),
            Resource::Stamina => (self.current_stamina, self.max_stamina),
            Resource::TechPower => (self.current_tech_power, self.max_tech_power),
            Resource::Armor => (self.current_armor, self.max_armor),
        }
    }
}

pub fn format_resource_display(actor: &Actor) -> ResourceDisplay {
    let truncate = |value: f64| value.trunc() as i64;
    let pair = |resource| (truncate(actor.current(resource)), truncate(actor.max(resource)));

    let (current_health, max_health) = pair(Resource::Health);
    let (current_stamina, max_stamina) = pair(Resource::Stamina);
    let (current_tech_power, max_tech_power) = pair(Resource::TechPower);
    let (current_armor, max_armor) = pair(Resource::Armor);

    ResourceDisplay {
        current_health,
        max_health,
        current_stamina,
        max_stamina,
        current_tech_power,
        max_tech_power,
        current_armor,
        max_armor,
        is_incapacitated: actor.is_incapacitated(),
    }
}

/// One-line status, e.g. `"Health: 42/110 | Stamina: 60/60 | Tech Power: 18/18 | Armor: 0/32"`.
///
/// `" | Status: INCAPACITATED"` is appended when health is at zero.
///
/// # Examples
///
/// ```rust
/// use combat_core::{format_combat_status, Actor, ActorKind, BaseStats, Resource, ResourcePool};
///
/// let actor = Actor::new("character:5", ActorKind::Character, 1, BaseStats::new())
///     .unwrap()
///     .with_pool(Resource::Health, ResourcePool::new(42.9, 110.0).unwrap());
///
/// assert_eq!(
///     format_combat_status(&actor),
///     "Health: 42/110 | Stamina: 0/0 | Tech Power: 0/0 | Armor: 0/0"
/// );
/// ```
pub fn format_combat_status(actor: &Actor) -> String {
    let display = format_resource_display(actor);
    let mut parts: Vec<String> = Resource::ALL
        .iter()
        .map(|resource| {
            let (current, max) = display.get(*resource);
            format!("{}: {current}/{max}", resource.label())
        })
        .collect();
    if display.is_incapacitated {
        parts.push("Status: INCAPACITATED".to_string());
    }
    parts.join(" | ")
}
