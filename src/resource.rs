//! Resource pools.
//!
//! An actor has four combat resources. Each is stored as a `ResourcePool`,
//! which is the only place the `0 <= current <= max` invariant is enforced:
//! the constructor rejects out-of-range input and every setter clamps.

use crate::error::CombatError;
use serde::{Deserialize, Serialize};

/// One of the four combat resources.
///
/// Serialized as `"health"`, `"stamina"`, `"tech_power"` and `"armor"`.
/// The `max_` prefixed names used by item templates are accepted as
/// aliases when deserializing.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    #[serde(alias = "max_health")]
    Health,
    #[serde(alias = "max_stamina")]
    Stamina,
    #[serde(alias = "max_tech_power")]
    TechPower,
    #[serde(alias = "max_armor")]
    Armor,
}

impl Resource {
    /// All resources in display order.
    pub const ALL: [Resource; 4] = [
        Resource::Health,
        Resource::Stamina,
        Resource::TechPower,
        Resource::Armor,
    ];

    /// Snake-case key, as used in effect keys and serialized maps.
    pub fn key(self) -> &'static str {
        match self {
            Resource::Health => "health",
            Resource::Stamina => "stamina",
            Resource::TechPower => "tech_power",
            Resource::Armor => "armor",
        }
    }

    /// Human readable label used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Health => "Health",
            Resource::Stamina => "Stamina",
            Resource::TechPower => "Tech Power",
            Resource::Armor => "Armor",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // lowercase label, e.g. "tech power"
        write!(f, "{}", self.label().to_lowercase())
    }
}

/// A bounded resource value.
///
/// Invariant: `0 <= current <= max`, both finite. Construction through
/// `ResourcePool::new` or deserialization validates it; the crate-internal
/// setters clamp, so no mutation can break it.
///
/// # Examples
///
/// ```rust
/// use combat_core::ResourcePool;
///
/// let pool = ResourcePool::new(40.0, 100.0).unwrap();
/// assert_eq!(pool.current(), 40.0);
/// assert_eq!(pool.missing(), 60.0);
///
/// assert!(ResourcePool::new(120.0, 100.0).is_err());
/// assert!(ResourcePool::new(-1.0, 100.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PoolRepr", into = "PoolRepr")]
pub struct ResourcePool {
    current: f64,
    max: f64,
}

#[derive(Serialize, Deserialize)]
struct PoolRepr {
    current: f64,
    max: f64,
}

impl TryFrom<PoolRepr> for ResourcePool {
    type Error = CombatError;

    fn try_from(repr: PoolRepr) -> Result<Self, Self::Error> {
        ResourcePool::new(repr.current, repr.max)
    }
}

impl From<ResourcePool> for PoolRepr {
    fn from(pool: ResourcePool) -> Self {
        PoolRepr {
            current: pool.current,
            max: pool.max,
        }
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ResourcePool {
    /// A pool with zero capacity.
    pub const EMPTY: ResourcePool = ResourcePool {
        current: 0.0,
        max: 0.0,
    };

    /// Create a pool, rejecting values outside `0 <= current <= max`.
    pub fn new(current: f64, max: f64) -> Result<Self, CombatError> {
        if !current.is_finite() || !max.is_finite() {
            return Err(CombatError::invalid(format!(
                "resource values must be finite (current {current}, max {max})"
            )));
        }
        if max < 0.0 {
            return Err(CombatError::invalid(format!(
                "resource max must be non-negative, got {max}"
            )));
        }
        if current < 0.0 || current > max {
            return Err(CombatError::invalid(format!(
                "resource current {current} outside [0, {max}]"
            )));
        }
        Ok(Self { current, max })
    }

    /// Create a pool filled to `max`.
    pub fn full(max: f64) -> Result<Self, CombatError> {
        Self::new(max, max)
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Room left before the pool is full.
    pub fn missing(&self) -> f64 {
        self.max - self.current
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Return a copy with `current` clamped into `[0, max]`.
    pub(crate) fn with_current(self, current: f64) -> Self {
        let current = if current.is_nan() { 0.0 } else { current };
        Self {
            current: current.clamp(0.0, self.max),
            max: self.max,
        }
    }

    /// Return a copy with a new maximum, clamping `current` down if needed.
    pub(crate) fn with_max(self, max: f64) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: self.current.min(max),
            max,
        }
    }
}
