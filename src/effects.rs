//! Active buffs and debuffs.
//!
//! Effects are stored on the actor record as a free-form key-value map.
//! This crate only interprets the restoration keys
//! (`"<resource>_restoration_bonus"` / `"<resource>_restoration_multiplier"`);
//! everything else is carried through untouched.

use crate::modifier::StackRule;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key-value store of active effects.
///
/// # Examples
///
/// ```rust
/// use combat_core::Effects;
///
/// let mut effects = Effects::new();
/// effects.set("stamina_restoration_multiplier", 1.5);
/// effects.set("poisoned", true);
///
/// let poisoned: Option<bool> = effects.get("poisoned");
/// assert_eq!(poisoned, Some(true));
/// assert_eq!(effects.number("stamina_restoration_multiplier"), Some(1.5));
/// assert_eq!(effects.number("poisoned"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Effects {
    data: BTreeMap<String, serde_json::Value>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a buff or debuff under `key`, replacing any earlier value.
    /// A value with no JSON form (a map with non-string keys, say) is dropped.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.set(key, value);
        self
    }

    /// Get an effect value, or `None` if missing or of another type.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Numeric value of an effect. Non-numeric values read as `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(serde_json::Value::as_f64)
    }

    /// Drop an expired effect, returning its last value.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Every numeric restoration modifier, as `(resource, rule, value)`.
    pub(crate) fn restoration_entries(
        &self,
    ) -> impl Iterator<Item = (Resource, StackRule, f64)> + '_ {
        self.data.iter().filter_map(|(key, value)| {
            let (resource, rule) = parse_restoration_key(key)?;
            Some((resource, rule, value.as_f64()?))
        })
    }
}

fn parse_restoration_key(key: &str) -> Option<(Resource, StackRule)> {
    let (prefix, rule) = if let Some(prefix) = key.strip_suffix("_restoration_bonus") {
        (prefix, StackRule::Additive)
    } else if let Some(prefix) = key.strip_suffix("_restoration_multiplier") {
        (prefix, StackRule::Multiplicative)
    } else {
        return None;
    };
    Resource::ALL
        .into_iter()
        .find(|r| r.key() == prefix)
        .map(|r| (r, rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_set_get() {
        let mut effects = Effects::new();
        effects.set("duration_turns", 3);

        let turns: Option<i32> = effects.get("duration_turns");
        assert_eq!(turns, Some(3));
        assert_eq!(effects.get::<i32>("missing"), None);
    }

    #[test]
    fn test_effects_set_drops_value_without_json_form() {
        let mut effects = Effects::new();
        let keyed_by_pair: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);
        effects.set("grid", keyed_by_pair);
        assert_eq!(effects.remove("grid"), None);
    }

    #[test]
    fn test_remove_expired_effect() {
        let mut effects = Effects::new()
            .with("stamina_restoration_multiplier", 2.0)
            .with("health_restoration_bonus", 0.5);

        let expired = effects.remove("stamina_restoration_multiplier");
        assert_eq!(expired, Some(serde_json::json!(2.0)));
        assert_eq!(effects.remove("stamina_restoration_multiplier"), None);

        let entries: Vec<_> = effects.restoration_entries().collect();
        assert_eq!(entries, vec![(Resource::Health, StackRule::Additive, 0.5)]);
    }

    #[test]
    fn test_restoration_key_parsing() {
        assert_eq!(
            parse_restoration_key("tech_power_restoration_bonus"),
            Some((Resource::TechPower, StackRule::Additive))
        );
        assert_eq!(
            parse_restoration_key("armor_restoration_multiplier"),
            Some((Resource::Armor, StackRule::Multiplicative))
        );
        assert_eq!(parse_restoration_key("mana_restoration_bonus"), None);
        assert_eq!(parse_restoration_key("health_bonus"), None);
    }

    #[test]
    fn test_restoration_entries_skip_non_numeric() {
        let effects = Effects::new()
            .with("health_restoration_bonus", 0.5)
            .with("stamina_restoration_multiplier", "fast")
            .with("stealthed", true);

        let entries: Vec<_> = effects.restoration_entries().collect();
        assert_eq!(entries, vec![(Resource::Health, StackRule::Additive, 0.5)]);
    }

    #[test]
    fn test_effects_serialize_as_plain_map() {
        let effects = Effects::new().with("health_restoration_bonus", 1.0);
        let json = serde_json::to_string(&effects).unwrap();
        assert_eq!(json, r#"{"health_restoration_bonus":1.0}"#);
    }
}
