//! # combat-core - Combat Resource and Restoration Engine
//!
//! The numeric core of a text RPG backend. It owns how much health,
//! stamina, tech power and armor an actor has, how combat actions spend
//! and reduce those pools, and how they regenerate over time:
//! - **Clamped** pools (`0 <= current <= max`, enforced by `ResourcePool`)
//! - **Pure** operations (take an `&Actor`, return a new snapshot plus a record)
//! - **Time-correct** restoration (one catch-up step equals many ticks)
//! - **Deterministic** modifier stacking (`(base + Σbonus) × Πmultiplier`)
//!
//! Persistence, command dispatch and presentation are the caller's job.
//!
//! ## Core Concepts
//!
//! ```text
//! [BaseStats + level + class + equipment] → maxima
//! [Actor] → DamageProcessor / RestorationService → Outcome { Actor, result }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use combat_core::*;
//!
//! let stats = BaseStats::uniform(10).unwrap();
//! let vest = ItemTemplate::new("Reinforced Vest").with_resource_bonus(Resource::Armor, 15.0);
//! let equipment = EquipmentEffects::from_items(&[vest]);
//!
//! let actor = Actor::spawn(
//!     "character:1",
//!     ActorKind::Character,
//!     1,
//!     Some(CharacterClass::Enforcer),
//!     stats,
//!     &equipment,
//! )
//! .unwrap();
//! // DEX×3 + level×2 + 15
//! assert_eq!(actor.max(Resource::Armor), 47.0);
//!
//! let processor = DamageProcessor::default();
//! let hit = processor.apply_damage(&actor, 60.0, DamageType::Physical).unwrap();
//! assert_eq!(hit.actor.current(Resource::Armor), 0.0);
//! assert_eq!(hit.result.after(Resource::Health), Some(actor.max(Resource::Health) - 13.0));
//!
//! let service = RestorationService::default();
//! let rates = service.rates_for(&hit.actor, &[], &Effects::new()).unwrap();
//! let rested = service.restore_resources(&hit.actor, &rates, 60.0).unwrap();
//! assert!(rested.result.has_changes(0.01));
//! ```
//!
//! ## Modules
//!
//! - [`resource`] - Resource kinds and clamped pools
//! - [`stat`] - Base stats
//! - [`modifier`] - Bonus and multiplier stacking
//! - [`class`] - Character class profiles
//! - [`actor`] - Actor snapshots
//! - [`effects`] - Buff and debuff store
//! - [`equipment`] - Equipment effect aggregation
//! - [`maxima`] - Resource maxima
//! - [`damage`] - Damage, healing and resource spending
//! - [`restoration`] - Restoration over time
//! - [`progression`] - Experience and levelling
//! - [`display`] - Player-facing formatting
//! - [`result`] - Result records
//! - [`config`] - Engine configuration
//! - [`error`] - Error types

pub mod actor;
pub mod class;
pub mod config;
pub mod damage;
pub mod display;
pub mod effects;
pub mod equipment;
pub mod error;
pub mod maxima;
pub mod modifier;
pub mod progression;
pub mod resource;
pub mod restoration;
pub mod result;
pub mod stat;

// Re-export main types for convenience
pub use actor::{Actor, ActorId, ActorKind};
pub use class::{CharacterClass, PoolProfile};
pub use config::{CombatConfig, DamageConfig, RestorationConfig};
pub use effects::Effects;
pub use error::{CombatError, ConfigError};
pub use modifier::{Modifier, ModifierTable, StackRule};
pub use resource::{Resource, ResourcePool};
pub use result::{CombatResult, Outcome, ResourceChange, RestorationResult};
pub use stat::{BaseStats, Stat};

// Re-export calculators and services
pub use damage::{
    check_incapacitation, scale_healing, scale_outgoing_damage, CombatStatus, DamageProcessor,
    DamageType,
};
pub use display::{format_combat_status, format_resource_display, ResourceDisplay};
pub use equipment::{
    calculate_damage_bonuses, calculate_damage_multipliers, calculate_healing_bonuses,
    calculate_resource_bonuses, calculate_stat_bonuses, calculate_stat_multipliers,
    get_inventory_slots_bonus, EquipmentEffects, ItemTemplate, RegenerationModifier,
};
pub use maxima::{
    calculate_max_armor, calculate_max_health, calculate_max_stamina, calculate_max_tech_power,
    calculate_maxima, ResourceMaxima,
};
pub use progression::{
    add_experience, apply_level_up, calculate_exp_for_level, calculate_experience_reward,
    refresh_maxima, LevelUp,
};
pub use restoration::{
    calculate_buff_restoration_modifiers, calculate_equipment_restoration_modifiers,
    calculate_restoration_rates, RestorationModifiers, RestorationRates, RestorationService,
};
