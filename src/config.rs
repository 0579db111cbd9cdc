//! Engine configuration.
//!
//! Every knob has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! [damage]
//! tech_resistance_ratio = 1.0
//! unconscious_after_turns = 3
//!
//! [restoration]
//! tick_interval_seconds = 1.0
//! min_tick_seconds = 0.9
//! change_tolerance = 0.01
//! incapacitated_health_factor = 0.0
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the damage and healing processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    /// Share of incoming tech damage that tech power can soak up.
    pub tech_resistance_ratio: f64,
    /// Turns ended at zero health before an actor reads as unconscious.
    pub unconscious_after_turns: u32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            tech_resistance_ratio: 1.0,
            unconscious_after_turns: 3,
        }
    }
}

/// Settings for the restoration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestorationConfig {
    /// Interval callers are expected to tick at.
    pub tick_interval_seconds: f64,
    /// Ticks closer together than this are skipped.
    pub min_tick_seconds: f64,
    /// Restored amounts at or below this count as "no change".
    pub change_tolerance: f64,
    /// Fraction of the health rate an incapacitated actor still receives.
    pub incapacitated_health_factor: f64,
}

impl Default for RestorationConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: 1.0,
            min_tick_seconds: 0.9,
            change_tolerance: 0.01,
            incapacitated_health_factor: 0.0,
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```rust
/// use combat_core::CombatConfig;
///
/// let config = CombatConfig::from_toml_str(
///     r#"
///     [damage]
///     tech_resistance_ratio = 0.5
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.damage.tech_resistance_ratio, 0.5);
/// assert_eq!(config.damage.unconscious_after_turns, 3);
/// assert_eq!(config.restoration.min_tick_seconds, 0.9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub damage: DamageConfig,
    pub restoration: RestorationConfig,
}

impl CombatConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded combat config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.damage.tech_resistance_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "damage.tech_resistance_ratio must be a non-negative number, got {ratio}"
            )));
        }

        let restoration = &self.restoration;
        for (name, value) in [
            ("tick_interval_seconds", restoration.tick_interval_seconds),
            ("min_tick_seconds", restoration.min_tick_seconds),
            ("change_tolerance", restoration.change_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "restoration.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if restoration.tick_interval_seconds == 0.0 {
            return Err(ConfigError::Invalid(
                "restoration.tick_interval_seconds must be greater than 0".to_string(),
            ));
        }
        if restoration.min_tick_seconds > restoration.tick_interval_seconds {
            return Err(ConfigError::Invalid(format!(
                "restoration.min_tick_seconds ({}) exceeds tick_interval_seconds ({})",
                restoration.min_tick_seconds, restoration.tick_interval_seconds
            )));
        }
        let factor = restoration.incapacitated_health_factor;
        if !(0.0..=1.0).contains(&factor) {
            return Err(ConfigError::Invalid(format!(
                "restoration.incapacitated_health_factor must be within [0, 1], got {factor}"
            )));
        }
        Ok(())
    }
}
