//! Error types for prize weight scaling

use thiserror::Error;

use crate::scaling::ScalingMethod;

/// Scaling and redistribution error type
///
/// Every variant is fatal to the evaluation that raised it. They describe
/// defects in authored game content (or in the engine itself), so callers
/// surface them instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    #[error("Scaling added {surplus} weight but no redistribution rules were supplied")]
    NoRedistributionRules { surplus: u64 },

    #[error("Insufficient sender weight: {remaining} surplus weight left after applying all rules")]
    InsufficientWeight { remaining: u64 },

    #[error("Surplus underflow: adjustment {adjusted} exceeds remaining surplus {surplus}")]
    SurplusUnderflow { surplus: u64, adjusted: u64 },

    #[error("Weight overflow while scaling or redistributing entry '{id}'")]
    WeightOverflow { id: String },

    #[error("Invalid scaling factor {factor} for {method:?} (must be >= 1)")]
    InvalidScalingFactor { method: ScalingMethod, factor: u64 },

    #[error("Invalid transfer factor {factor} for rule {sender} -> {receiver} (must be > 1)")]
    InvalidTransferFactor {
        receiver: String,
        sender: String,
        factor: u64,
    },

    #[error("Transfer factor {0} too small (must be > 1)")]
    TransferFactorTooSmall(u64),

    #[error("Duplicate table id: {0}")]
    DuplicateId(String),

    #[error("Index {index} out of range for table of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Weight count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScaleError {
    /// Authoring defect in tables, rules or factors
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ScaleError::NoRedistributionRules { .. }
                | ScaleError::InsufficientWeight { .. }
                | ScaleError::InvalidScalingFactor { .. }
                | ScaleError::InvalidTransferFactor { .. }
                | ScaleError::TransferFactorTooSmall(_)
                | ScaleError::DuplicateId(_)
                | ScaleError::InvalidConfig(_)
        )
    }

    /// Arithmetic that should be structurally impossible
    pub fn is_arithmetic_fault(&self) -> bool {
        matches!(
            self,
            ScaleError::SurplusUnderflow { .. } | ScaleError::WeightOverflow { .. }
        )
    }
}

/// Result type alias
pub type ScaleResult<T> = Result<T, ScaleError>;
