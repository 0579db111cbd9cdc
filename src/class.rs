//! Character classes.
//!
//! A class contributes a flat amount (plus an optional per-level amount)
//! to each resource maximum, and a flat amount to each base restoration
//! rate. NPCs usually have no class and get nothing from this module.

use crate::resource::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Enforcer,
    TechWizard,
    SmoothTalker,
    Spy,
    WildCard,
}

/// Contribution of a class to one resource maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolProfile {
    pub base: f64,
    pub per_level: f64,
}

impl PoolProfile {
    const fn new(base: f64, per_level: f64) -> Self {
        Self { base, per_level }
    }

    pub fn at_level(self, level: u32) -> f64 {
        self.base + self.per_level * f64::from(level)
    }
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 5] = [
        CharacterClass::Enforcer,
        CharacterClass::TechWizard,
        CharacterClass::SmoothTalker,
        CharacterClass::Spy,
        CharacterClass::WildCard,
    ];

    /// Class contribution to the maximum of `resource`.
    pub fn pool_profile(self, resource: Resource) -> PoolProfile {
        use CharacterClass::*;
        match (self, resource) {
            (_, Resource::Armor) => PoolProfile::default(),
            (Enforcer, Resource::Health) => PoolProfile::new(50.0, 5.0),
            (Enforcer, Resource::Stamina) => PoolProfile::new(30.0, 0.0),
            (Enforcer, Resource::TechPower) => PoolProfile::new(10.0, 0.0),
            (TechWizard, Resource::Health) => PoolProfile::new(20.0, 0.0),
            (TechWizard, Resource::Stamina) => PoolProfile::new(15.0, 0.0),
            (TechWizard, Resource::TechPower) => PoolProfile::new(50.0, 10.0),
            (SmoothTalker, Resource::Health) => PoolProfile::new(30.0, 0.0),
            (SmoothTalker, Resource::Stamina) => PoolProfile::new(20.0, 0.0),
            (SmoothTalker, Resource::TechPower) => PoolProfile::new(30.0, 0.0),
            (Spy, Resource::Health) => PoolProfile::new(25.0, 0.0),
            (Spy, Resource::Stamina) => PoolProfile::new(40.0, 0.0),
            (Spy, Resource::TechPower) => PoolProfile::new(25.0, 0.0),
            (WildCard, Resource::Health) => PoolProfile::new(35.0, 0.0),
            (WildCard, Resource::Stamina) => PoolProfile::new(25.0, 0.0),
            (WildCard, Resource::TechPower) => PoolProfile::new(35.0, 0.0),
        }
    }

    /// Class contribution to the base per-second restoration of `resource`.
    ///
    /// Tech wizards regain tech power faster as they level.
    pub fn restoration_base(self, resource: Resource, level: u32) -> f64 {
        use CharacterClass::*;
        match (self, resource) {
            (_, Resource::Armor) => 0.0,
            (Enforcer, Resource::Health) => 0.3,
            (Enforcer, Resource::Stamina) => 0.2,
            (Enforcer, Resource::TechPower) => 0.05,
            (TechWizard, Resource::Health) => 0.1,
            (TechWizard, Resource::Stamina) => 0.1,
            (TechWizard, Resource::TechPower) => 0.5 + 0.1 * f64::from(level),
            (SmoothTalker, Resource::Health) => 0.15,
            (SmoothTalker, Resource::Stamina) => 0.15,
            (SmoothTalker, Resource::TechPower) => 0.2,
            (Spy, Resource::Health) => 0.12,
            (Spy, Resource::Stamina) => 0.25,
            (Spy, Resource::TechPower) => 0.15,
            (WildCard, Resource::Health) => 0.18,
            (WildCard, Resource::Stamina) => 0.18,
            (WildCard, Resource::TechPower) => 0.25,
        }
    }
}

/// Pool contribution for an optional class.
pub(crate) fn pool_bonus(class: Option<CharacterClass>, resource: Resource, level: u32) -> f64 {
    class.map_or(0.0, |c| c.pool_profile(resource).at_level(level))
}

/// Restoration contribution for an optional class.
pub(crate) fn restoration_bonus(
    class: Option<CharacterClass>,
    resource: Resource,
    level: u32,
) -> f64 {
    class.map_or(0.0, |c| c.restoration_base(resource, level))
}
