//! # rf-prize-scale — Bet-scaled prize weight redistribution
//!
//! Rescales a weighted prize table by bet-derived factors, then removes the
//! weight the scaling added by moving weight between sender/receiver entry
//! pairs. The result keeps the table's total weight and its expected payout,
//! and is exactly reproducible (integer arithmetic only).
//!
//! ## Architecture
//!
//! ```text
//! WeightDistributor (DistributorConfig: minimum_sender_weight)
//!     │
//!     ├── WeightedTable (id, weight, ScalingMethod)
//!     ├── ScalingFactors (ScalingMethod → multiplier, default 1)
//!     └── [TransferRule] (receiver ← sender × transfer_factor)
//!           │
//!           v
//!     Vec<u64> → WeightedTable::with_weights → DistributionReport
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rf_prize_scale::*;
//!
//! let table = WeightedTable::new(vec![
//!     WeightedEntry::new("MINI", 100, ScalingMethod::StakeMultiplier),
//!     WeightedEntry::fixed("MINOR", 50),
//!     WeightedEntry::fixed("BLANK", 1000),
//! ])?;
//! let factors = ScalingFactors::new().with_factor(ScalingMethod::StakeMultiplier, 2);
//! let rules = vec![TransferRule::new("MINOR", "BLANK", 2)];
//!
//! let weights = WeightDistributor::new().compute_scaled_weights(&table, &rules, &factors)?;
//! assert_eq!(weights, vec![200, 150, 800]);
//! # Ok::<(), ScaleError>(())
//! ```

pub mod config;
pub mod distributor;
pub mod error;
pub mod report;
pub mod scaling;
pub mod table;
pub mod transfer;

pub use config::*;
pub use distributor::*;
pub use error::*;
pub use report::*;
pub use scaling::*;
pub use table::*;
pub use transfer::*;
