//! Scaling methods and per-bet scaling factors

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// Rescaling policy attached to a table entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScalingMethod {
    /// Weight is never rescaled
    #[default]
    None = 0,
    /// Scaled by the stake (bet) multiplier
    StakeMultiplier = 1,
    /// Scaled by the total bet
    TotalBet = 2,
    /// Scaled by the total bet expressed in credit units
    TotalBetInUnits = 3,
}

/// Multiplier lookup keyed by scaling method
///
/// Supplied per evaluation (it depends on the current bet). Methods without
/// an explicit factor scale by 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingFactors {
    #[serde(default)]
    factors: HashMap<ScalingMethod, u64>,
}

impl ScalingFactors {
    /// Empty lookup (every method scales by 1)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the factor for a method
    pub fn with_factor(mut self, method: ScalingMethod, factor: u64) -> Self {
        self.factors.insert(method, factor);
        self
    }

    /// Set the factor for a method
    pub fn set(&mut self, method: ScalingMethod, factor: u64) {
        self.factors.insert(method, factor);
    }

    /// Factor for a method, or 1 when none was supplied
    pub fn factor_for(&self, method: ScalingMethod) -> u64 {
        self.factors.get(&method).copied().unwrap_or(1)
    }

    /// Factor for a method, rejecting factors below 1
    pub fn checked_factor_for(&self, method: ScalingMethod) -> ScaleResult<u64> {
        match self.factor_for(method) {
            0 => Err(ScaleError::InvalidScalingFactor { method, factor: 0 }),
            factor => Ok(factor),
        }
    }

    /// True when no method would change a weight
    pub fn is_identity(&self) -> bool {
        self.factors.values().all(|&f| f == 1)
    }
}

impl FromIterator<(ScalingMethod, u64)> for ScalingFactors {
    fn from_iter<I: IntoIterator<Item = (ScalingMethod, u64)>>(iter: I) -> Self {
        Self {
            factors: iter.into_iter().collect(),
        }
    }
}
