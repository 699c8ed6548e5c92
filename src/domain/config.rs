// ============================================================================
// Engine Configuration
// Store namespace and market admission rules
// ============================================================================

use super::order::{validate_unit, KEY_SEPARATOR};
use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default store namespace, shared by every key the engine writes
pub const DEFAULT_NAMESPACE: &str = "orderbook";

/// Default upper bound on unit-name length
pub const DEFAULT_MAX_UNIT_LENGTH: usize = 64;

// ============================================================================
// Complete Engine Configuration
// ============================================================================

/// Configuration for building a matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix for every persisted key, so several engines can share one store
    pub namespace: String,

    /// Optional: Units that may be traded
    /// None means any well-formed unit is accepted
    pub allowed_units: Option<BTreeSet<String>>,

    /// Maximum length of a unit name
    pub max_unit_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl EngineConfig {
    /// Create a new configuration with required parameters
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            allowed_units: None,
            max_unit_length: DEFAULT_MAX_UNIT_LENGTH,
        }
    }

    /// Builder method: Restrict tradable units
    pub fn with_allowed_units<I, U>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.allowed_units = Some(units.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method: Set maximum unit-name length
    pub fn with_max_unit_length(mut self, length: usize) -> Self {
        self.max_unit_length = length;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> EngineResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "namespace cannot be empty".to_string(),
            ));
        }

        if self.namespace.contains(KEY_SEPARATOR) {
            return Err(EngineError::InvalidConfig(format!(
                "namespace cannot contain '{}'",
                KEY_SEPARATOR
            )));
        }

        if self.max_unit_length == 0 {
            return Err(EngineError::InvalidConfig(
                "max unit length must be positive".to_string(),
            ));
        }

        if let Some(units) = &self.allowed_units {
            if units.is_empty() {
                return Err(EngineError::InvalidConfig(
                    "allowed unit list cannot be empty".to_string(),
                ));
            }
            for unit in units {
                self.check_unit_shape(unit)
                    .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
            }
        }

        Ok(())
    }

    /// Check that a unit is well-formed and admitted by this configuration
    pub fn validate_unit(&self, unit: &str) -> EngineResult<()> {
        self.check_unit_shape(unit)?;

        match &self.allowed_units {
            Some(units) if !units.contains(unit) => {
                Err(EngineError::InvalidUnit(unit.to_string()))
            },
            _ => Ok(()),
        }
    }

    fn check_unit_shape(&self, unit: &str) -> EngineResult<()> {
        validate_unit(unit)?;
        if unit.len() > self.max_unit_length {
            return Err(EngineError::InvalidUnit(unit.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl EngineConfig {
    /// Any well-formed unit may be traded
    pub fn permissive(namespace: impl Into<String>) -> Self {
        Self::new(namespace)
    }

    /// Only the listed units may be traded
    pub fn restricted<I, U>(namespace: impl Into<String>, units: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self::new(namespace).with_allowed_units(units)
    }
}
