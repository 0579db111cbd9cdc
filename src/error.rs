//! Error types for combat resource calculations.
//!
//! Every fallible operation in this crate returns a `CombatError`.
//! Loading configuration has its own `ConfigError` since it is the only
//! place that touches the filesystem.

use crate::actor::ActorId;
use crate::resource::Resource;
use thiserror::Error;

/// Errors that can occur while calculating or mutating actor resources.
///
/// # Examples
///
/// ```rust
/// use combat_core::{CombatError, Resource};
///
/// let err = CombatError::InsufficientResource {
///     resource: Resource::Stamina,
///     requested: 30.0,
///     available: 10.0,
/// };
/// assert_eq!(err.to_string(), "Insufficient stamina: requested 30.0, available 10.0");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombatError {
    /// Malformed or missing actor input (level 0, unknown or missing stat,
    /// invalid pool bounds, non-finite amounts).
    ///
    /// The operation produced no partial result. Retrying without fixing
    /// the input yields the same error.
    #[error("Invalid actor state: {0}")]
    InvalidActorState(String),

    /// A consumption request exceeded what the actor currently has.
    ///
    /// Recoverable: the caller should reject or replace the action.
    #[error("Insufficient {resource}: requested {requested:.1}, available {available:.1}")]
    InsufficientResource {
        resource: Resource,
        requested: f64,
        available: f64,
    },

    /// An amount that must be non-negative was negative.
    #[error("Negative amount for {operation}: {amount}")]
    NegativeAmount {
        operation: &'static str,
        amount: f64,
    },

    /// The actor is incapacitated and cannot spend stamina or tech power.
    #[error("Actor {0} is incapacitated")]
    Incapacitated(ActorId),
}

impl CombatError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CombatError::InvalidActorState(message.into())
    }
}

/// Validate an amount that must be finite and non-negative.
pub(crate) fn check_amount(operation: &'static str, amount: f64) -> Result<f64, CombatError> {
    if amount.is_nan() || amount.is_infinite() {
        return Err(CombatError::invalid(format!(
            "{operation} amount must be finite, got {amount}"
        )));
    }
    if amount < 0.0 {
        return Err(CombatError::NegativeAmount { operation, amount });
    }
    Ok(amount)
}

/// Errors raised while loading a `CombatConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for `CombatConfig`.
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}
