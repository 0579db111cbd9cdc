//! Skirmish Example
//!
//! Walks one character through a short fight and the rest afterwards:
//! - Spawning from stats, class and equipment
//! - Physical and tech damage routing
//! - Spending stamina until it runs out
//! - Catch-up restoration after time away
//! - Experience reward and level-up

use chrono::{Duration, Utc};
use combat_core::*;

// ============================================================================
// Setup
// ============================================================================

fn gear() -> Vec<ItemTemplate> {
    vec![
        ItemTemplate::new("Ballistic Weave")
            .with_resource_bonus(Resource::Armor, 12.0)
            .with_regeneration(Resource::Armor, Some(0.3), None),
        ItemTemplate::new("Arc Knuckles")
            .with_damage_bonus(DamageType::Tech, 6.0)
            .with_damage_multiplier(DamageType::Tech, 1.2),
        ItemTemplate::new("Cardio Implant").with_regeneration(Resource::Stamina, None, Some(1.5)),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Skirmish ===\n");

    let items = gear();
    let equipment = EquipmentEffects::from_items(&items);
    let stats = BaseStats::from_pairs([
        ("STR", 14),
        ("DEX", 12),
        ("INT", 9),
        ("CHA", 8),
        ("PER", 11),
        ("LUK", 10),
    ])?;

    let hero = Actor::spawn(
        "character:ria",
        ActorKind::Character,
        2,
        Some(CharacterClass::Enforcer),
        stats,
        &equipment,
    )?;
    println!("Spawned: {}", format_combat_status(&hero));

    // ========================================================================
    // Combat
    // ========================================================================

    let config = CombatConfig::default();
    let processor = DamageProcessor::new(config.damage.clone());

    let hit = processor.apply_damage(&hero, 50.0, DamageType::Physical)?;
    println!("{}", hit.result.message.as_deref().unwrap_or_default());

    let zap = processor.apply_damage(&hit.actor, 30.0, DamageType::Tech)?;
    println!("{}", zap.result.message.as_deref().unwrap_or_default());

    let mut actor = zap.actor;
    loop {
        match processor.consume_stamina(&actor, 25.0) {
            Ok(outcome) => {
                println!("{}", outcome.result.message.as_deref().unwrap_or_default());
                actor = outcome.actor;
            }
            Err(err) => {
                println!("Cannot act: {err}");
                break;
            }
        }
    }

    let outgoing = scale_outgoing_damage(20.0, DamageType::Tech, &equipment)?;
    println!("Outgoing tech strike: {outgoing:.1}");
    println!("After combat: {}\n", format_combat_status(&actor));

    // ========================================================================
    // Rest
    // ========================================================================

    let service = RestorationService::new(config.restoration);
    let mut effects = Effects::new();
    effects.set("health_restoration_multiplier", 1.25);

    let rates = service.rates_for(&actor, &items, &effects)?;
    println!(
        "Rates/s: health {:.2}, stamina {:.2}, tech {:.2}, armor {:.2}",
        rates.health_per_second,
        rates.stamina_per_second,
        rates.tech_power_per_second,
        rates.armor_per_second
    );

    let now = Utc::now();
    let rested = service.catch_up_restoration(&actor, &rates, now - Duration::seconds(45), now)?;
    println!(
        "Rested {:.0}s (full after {:.1}s): {}\n",
        rested.result.requested_seconds,
        rested.result.elapsed_seconds,
        format_combat_status(&rested.actor)
    );

    // ========================================================================
    // Progression
    // ========================================================================

    let reward = calculate_experience_reward(5, rested.actor.level());
    let progress = add_experience(&rested.actor.with_experience(4000), reward * 10);
    let mut leveled = progress.actor;
    for _ in 0..progress.levels_gained {
        leveled = apply_level_up(&leveled)?;
    }
    let leveled = refresh_maxima(&leveled, &equipment)?;
    println!(
        "Earned {reward} exp, now level {} ({} levels gained)",
        leveled.level(),
        progress.levels_gained
    );
    println!("{}", format_combat_status(&leveled));

    Ok(())
}
