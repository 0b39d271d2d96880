//! Distributor configuration

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// Default floor a sender's weight may not drop below
pub const DEFAULT_MINIMUM_SENDER_WEIGHT: u64 = 1;

/// Distributor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributorConfig {
    /// Senders at or below this weight are skipped; no transfer takes a
    /// sender below it
    pub minimum_sender_weight: u64,
}

impl DistributorConfig {
    /// Config with a custom sender floor
    pub fn with_minimum_sender_weight(minimum_sender_weight: u64) -> Self {
        Self {
            minimum_sender_weight,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ScaleResult<()> {
        if self.minimum_sender_weight == u64::MAX {
            return Err(ScaleError::InvalidConfig(
                "minimum_sender_weight leaves no sender eligible".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            minimum_sender_weight: DEFAULT_MINIMUM_SENDER_WEIGHT,
        }
    }
}
