//! Actor snapshots.
//!
//! An `Actor` is a plain value copied out of the persistence layer. The
//! processors in this crate take `&Actor` and hand back a new `Actor`;
//! they never mutate the caller's copy.

use crate::class::CharacterClass;
use crate::equipment::EquipmentEffects;
use crate::error::CombatError;
use crate::maxima::{calculate_maxima, ResourceMaxima};
use crate::resource::{Resource, ResourcePool};
use crate::stat::BaseStats;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned identifier for an actor (character or NPC record key).
///
/// Uses `Arc<str>` so results can carry the id without copying strings.
///
/// # Examples
///
/// ```rust
/// use combat_core::ActorId;
///
/// let a = ActorId::from_str("character:7");
/// let b: ActorId = "character:7".into();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "character:7");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActorId(Arc<str>);

impl Serialize for ActorId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ActorId::from(s))
    }
}

impl ActorId {
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Character,
    Npc,
}

/// Snapshot of an actor's combat-relevant state.
///
/// Incapacitation is not stored: `is_incapacitated()` is derived from
/// health every time, so it cannot drift.
///
/// # Examples
///
/// ```rust
/// use combat_core::{Actor, ActorKind, BaseStats, EquipmentEffects, Resource};
///
/// let stats = BaseStats::uniform(10).unwrap();
/// let actor = Actor::spawn("npc:drone", ActorKind::Npc, 1, None, stats, &EquipmentEffects::default())
///     .unwrap();
///
/// // STR×8 + DEX×2 + level×10
/// assert_eq!(actor.max(Resource::Health), 110.0);
/// assert!(actor.is_at_full_resources());
/// assert!(!actor.is_incapacitated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActorRecord")]
pub struct Actor {
    id: ActorId,
    kind: ActorKind,
    level: u32,
    experience: u64,
    class: Option<CharacterClass>,
    stats: BaseStats,
    health: ResourcePool,
    stamina: ResourcePool,
    tech_power: ResourcePool,
    armor: ResourcePool,
    turns_incapacitated: u32,
}

/// Stored shape of an actor, validated into `Actor`.
#[derive(Deserialize)]
struct ActorRecord {
    id: ActorId,
    kind: ActorKind,
    level: u32,
    #[serde(default)]
    experience: u64,
    #[serde(default)]
    class: Option<CharacterClass>,
    stats: BaseStats,
    #[serde(default)]
    health: ResourcePool,
    #[serde(default)]
    stamina: ResourcePool,
    #[serde(default)]
    tech_power: ResourcePool,
    #[serde(default)]
    armor: ResourcePool,
    #[serde(default)]
    turns_incapacitated: u32,
}

impl TryFrom<ActorRecord> for Actor {
    type Error = CombatError;

    fn try_from(record: ActorRecord) -> Result<Self, Self::Error> {
        let actor = Actor::new(record.id, record.kind, record.level, record.stats)?;
        Ok(Actor {
            experience: record.experience,
            class: record.class,
            health: record.health,
            stamina: record.stamina,
            tech_power: record.tech_power,
            armor: record.armor,
            turns_incapacitated: record.turns_incapacitated,
            ..actor
        })
    }
}

impl Actor {
    /// Create an actor with empty pools.
    ///
    /// Fails with `InvalidActorState` if `level` is 0.
    pub fn new(
        id: impl Into<ActorId>,
        kind: ActorKind,
        level: u32,
        stats: BaseStats,
    ) -> Result<Self, CombatError> {
        if level == 0 {
            return Err(CombatError::invalid("level must be at least 1"));
        }
        Ok(Self {
            id: id.into(),
            kind,
            level,
            experience: 0,
            class: None,
            stats,
            health: ResourcePool::EMPTY,
            stamina: ResourcePool::EMPTY,
            tech_power: ResourcePool::EMPTY,
            armor: ResourcePool::EMPTY,
            turns_incapacitated: 0,
        })
    }

    /// Create an actor with derived maxima and every pool full.
    pub fn spawn(
        id: impl Into<ActorId>,
        kind: ActorKind,
        level: u32,
        class: Option<CharacterClass>,
        stats: BaseStats,
        equipment: &EquipmentEffects,
    ) -> Result<Self, CombatError> {
        let actor = Self::new(id, kind, level, stats)?.with_class(class);
        let maxima = calculate_maxima(&actor.stats, level, class, equipment)?;
        let mut actor = actor.with_maxima(maxima);
        for resource in Resource::ALL {
            let max = actor.max(resource);
            actor.set_current(resource, max);
        }
        Ok(actor)
    }

    pub fn with_class(mut self, class: Option<CharacterClass>) -> Self {
        self.class = class;
        self
    }

    pub fn with_experience(mut self, experience: u64) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_pool(mut self, resource: Resource, pool: ResourcePool) -> Self {
        *self.pool_mut(resource) = pool;
        self
    }

    /// Apply new maxima, clamping current values that no longer fit.
    pub fn with_maxima(&self, maxima: ResourceMaxima) -> Self {
        let mut next = self.clone();
        for resource in Resource::ALL {
            let pool = next.pool_mut(resource);
            *pool = pool.with_max(maxima.get(resource));
        }
        next
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn class(&self) -> Option<CharacterClass> {
        self.class
    }

    pub fn stats(&self) -> &BaseStats {
        &self.stats
    }

    pub fn pool(&self, resource: Resource) -> ResourcePool {
        match resource {
            Resource::Health => self.health,
            Resource::Stamina => self.stamina,
            Resource::TechPower => self.tech_power,
            Resource::Armor => self.armor,
        }
    }

    pub fn current(&self, resource: Resource) -> f64 {
        self.pool(resource).current()
    }

    pub fn max(&self, resource: Resource) -> f64 {
        self.pool(resource).max()
    }

    /// Consecutive turns ended while incapacitated.
    pub fn turns_incapacitated(&self) -> u32 {
        self.turns_incapacitated
    }

    /// True iff `current_health <= 0`.
    pub fn is_incapacitated(&self) -> bool {
        self.health.current() <= 0.0
    }

    pub fn is_at_full_resources(&self) -> bool {
        Resource::ALL.iter().all(|r| self.pool(*r).is_full())
    }

    fn pool_mut(&mut self, resource: Resource) -> &mut ResourcePool {
        match resource {
            Resource::Health => &mut self.health,
            Resource::Stamina => &mut self.stamina,
            Resource::TechPower => &mut self.tech_power,
            Resource::Armor => &mut self.armor,
        }
    }

    /// Set a current value, clamped into `[0, max]`. Returns the stored value.
    pub(crate) fn set_current(&mut self, resource: Resource, value: f64) -> f64 {
        let pool = self.pool_mut(resource);
        *pool = pool.with_current(value);
        pool.current()
    }

    pub(crate) fn set_turns_incapacitated(&mut self, turns: u32) {
        self.turns_incapacitated = turns;
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub(crate) fn set_experience(&mut self, experience: u64) {
        self.experience = experience;
    }

    pub(crate) fn stats_mut(&mut self) -> &mut BaseStats {
        &mut self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools(actor: Actor, health: (f64, f64)) -> Actor {
        actor.with_pool(
            Resource::Health,
            ResourcePool::new(health.0, health.1).unwrap(),
        )
    }

    #[test]
    fn test_actor_id_serde_is_plain_string() {
        let id = ActorId::from_str("character:1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""character:1""#);
        let back: ActorId = serde_json::from_str(r#""character:1""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_level_zero_rejected() {
        let err = Actor::new("npc:1", ActorKind::Npc, 0, BaseStats::new()).unwrap_err();
        assert!(matches!(err, CombatError::InvalidActorState(_)));
    }

    #[test]
    fn test_incapacitation_is_derived_from_health() {
        let actor = Actor::new("npc:1", ActorKind::Npc, 1, BaseStats::new()).unwrap();
        assert!(actor.is_incapacitated());

        let actor = pools(actor, (1.0, 10.0));
        assert!(!actor.is_incapacitated());
    }

    #[test]
    fn test_set_current_clamps() {
        let mut actor = pools(
            Actor::new("npc:1", ActorKind::Npc, 1, BaseStats::new()).unwrap(),
            (5.0, 10.0),
        );
        assert_eq!(actor.set_current(Resource::Health, 50.0), 10.0);
        assert_eq!(actor.set_current(Resource::Health, -50.0), 0.0);
    }

    #[test]
    fn test_with_maxima_clamps_down() {
        let actor = pools(
            Actor::new("npc:1", ActorKind::Npc, 1, BaseStats::new()).unwrap(),
            (80.0, 100.0),
        );
        let shrunk = actor.with_maxima(ResourceMaxima {
            health: 50.0,
            stamina: 0.0,
            tech_power: 0.0,
            armor: 0.0,
        });
        assert_eq!(shrunk.current(Resource::Health), 50.0);
        assert_eq!(shrunk.max(Resource::Health), 50.0);
        // the input snapshot is untouched
        assert_eq!(actor.current(Resource::Health), 80.0);
    }

    #[test]
    fn test_actor_deserialize_rejects_broken_pool() {
        let json = r#"{
            "id": "character:9",
            "kind": "character",
            "level": 2,
            "stats": {"STR": 10},
            "health": {"current": 120.0, "max": 100.0}
        }"#;
        assert!(serde_json::from_str::<Actor>(json).is_err());
    }

    #[test]
    fn test_actor_deserialize_rejects_level_zero() {
        let json = r#"{
            "id": "npc:4",
            "kind": "npc",
            "level": 0,
            "stats": {"STR": 10, "DEX": 10, "INT": 10}
        }"#;
        let err = serde_json::from_str::<Actor>(json).unwrap_err();
        assert!(err.to_string().contains("level must be at least 1"));
    }

    #[test]
    fn test_actor_deserialize_fills_defaults() {
        let json = r#"{
            "id": "npc:5",
            "kind": "npc",
            "level": 3,
            "stats": {"STR": 10},
            "health": {"current": 12.0, "max": 40.0}
        }"#;
        let actor: Actor = serde_json::from_str(json).unwrap();
        assert_eq!(actor.level(), 3);
        assert_eq!(actor.experience(), 0);
        assert_eq!(actor.class(), None);
        assert_eq!(actor.current(Resource::Health), 12.0);
        assert_eq!(actor.pool(Resource::Armor), ResourcePool::EMPTY);
    }
}
