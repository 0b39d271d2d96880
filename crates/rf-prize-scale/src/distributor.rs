//! Weight Distributor — bet scaling and surplus redistribution
//!
//! Scaling a table's weights by bet-derived factors adds weight ("surplus").
//! The distributor removes that surplus again by walking the transfer rules
//! in order, moving weight from senders to receivers until nothing is left.
//!
//! ```text
//! WeightedTable + ScalingFactors
//!     │
//!     v
//! scale_and_surplus() → ScaledWeights { weights, surplus, id_index }
//!     │
//!     v  + [TransferRule] + minimum_sender_weight
//! redistribute() → Vec<u64>  (index-aligned with the table)
//! ```
//!
//! Everything is integer arithmetic. The walk is greedy and order-sensitive:
//! the first eligible rule absorbs as much as it can before the next is
//! tried, so callers order rules by preference.

use std::collections::HashMap;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::DistributorConfig;
use crate::error::{ScaleError, ScaleResult};
use crate::scaling::ScalingFactors;
use crate::table::WeightedTable;
use crate::transfer::{TransferRule, calculate_weight_to_take};

/// Scaled weights before redistribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledWeights {
    /// `factor × weight` per entry, in table order
    pub weights: Vec<u64>,
    /// Weight added by scaling that still has to be absorbed
    pub surplus: u64,
    /// Table id → index
    pub id_index: HashMap<String, usize>,
}

impl ScaledWeights {
    /// Sum of the scaled weights
    pub fn total_weight(&self) -> u128 {
        self.weights.iter().map(|&w| w as u128).sum()
    }
}

/// Scale every entry by its method's factor and total the surplus.
pub fn scale_and_surplus(
    table: &WeightedTable,
    factors: &ScalingFactors,
) -> ScaleResult<ScaledWeights> {
    let mut weights = Vec::with_capacity(table.len());
    let mut id_index = HashMap::with_capacity(table.len());
    let mut surplus: u64 = 0;

    for (index, entry) in table.iter().enumerate() {
        let factor = factors.checked_factor_for(entry.scaling_method)?;
        let overflow = || ScaleError::WeightOverflow {
            id: entry.id.clone(),
        };

        let scaled = factor.checked_mul(entry.weight).ok_or_else(overflow)?;
        // factor >= 1, so scaled >= weight
        surplus = surplus
            .checked_add(scaled - entry.weight)
            .ok_or_else(overflow)?;

        weights.push(scaled);
        id_index.insert(entry.id.clone(), index);
    }

    debug!(
        "Scaled {} entries, surplus {}",
        weights.len(),
        surplus
    );

    Ok(ScaledWeights {
        weights,
        surplus,
        id_index,
    })
}

/// Absorb the surplus of `scaled` by applying `rules` in order.
///
/// Returns the final weights, index-aligned with the table `scaled` came
/// from. A zero surplus returns the weights unchanged without looking at the
/// rules.
///
/// # Errors
/// - `NoRedistributionRules` — surplus but no rules
/// - `InvalidTransferFactor` — an applicable rule with factor <= 1 is reached
/// - `InsufficientWeight` — surplus left after every rule
/// - `SurplusUnderflow`, `WeightOverflow` — arithmetic faults
pub fn redistribute(
    scaled: ScaledWeights,
    rules: &[TransferRule],
    minimum_sender_weight: u64,
) -> ScaleResult<Vec<u64>> {
    let ScaledWeights {
        mut weights,
        mut surplus,
        id_index,
    } = scaled;

    if surplus == 0 {
        return Ok(weights);
    }

    if rules.is_empty() {
        warn!("Surplus {} with no redistribution rules", surplus);
        return Err(ScaleError::NoRedistributionRules { surplus });
    }

    for rule in rules {
        let (Some(&receiver), Some(&sender)) = (
            id_index.get(&rule.receiver_id),
            id_index.get(&rule.sender_id),
        ) else {
            trace!(
                "Skipping rule {} -> {}: id not in table",
                rule.sender_id, rule.receiver_id
            );
            continue;
        };

        if receiver == sender {
            trace!("Skipping self-transfer rule on {}", rule.sender_id);
            continue;
        }

        let pool = weights[sender];
        if pool <= minimum_sender_weight {
            trace!(
                "Skipping rule {} -> {}: sender at floor ({} <= {})",
                rule.sender_id, rule.receiver_id, pool, minimum_sender_weight
            );
            continue;
        }

        rule.validate()?;
        let amounts =
            calculate_weight_to_take(surplus, pool, minimum_sender_weight, rule.transfer_factor)?;
        if amounts.is_empty() {
            continue;
        }

        weights[sender] = pool - amounts.send;
        weights[receiver] = weights[receiver]
            .checked_add(amounts.receive)
            .ok_or_else(|| ScaleError::WeightOverflow {
                id: rule.receiver_id.clone(),
            })?;
        surplus = surplus
            .checked_sub(amounts.adjusted)
            .ok_or(ScaleError::SurplusUnderflow {
                surplus,
                adjusted: amounts.adjusted,
            })?;

        trace!(
            "Rule {} -> {} (x{}): sent {}, received {}, surplus now {}",
            rule.sender_id,
            rule.receiver_id,
            rule.transfer_factor,
            amounts.send,
            amounts.receive,
            surplus
        );

        if surplus == 0 {
            break;
        }
    }

    if surplus > 0 {
        warn!("{} surplus weight left after {} rules", surplus, rules.len());
        return Err(ScaleError::InsufficientWeight { remaining: surplus });
    }

    Ok(weights)
}

/// Scale `table` by `factors` and redistribute the surplus over `rules`.
///
/// Convenience wrapper over [`scale_and_surplus`] and [`redistribute`].
/// The returned weights are index-aligned with `table`; pair them back with
/// [`WeightedTable::with_weights`].
pub fn compute_scaled_weights(
    table: &WeightedTable,
    rules: &[TransferRule],
    factors: &ScalingFactors,
    minimum_sender_weight: u64,
) -> ScaleResult<Vec<u64>> {
    let scaled = scale_and_surplus(table, factors)?;
    redistribute(scaled, rules, minimum_sender_weight)
}

/// Configured distributor
///
/// Holds only configuration; every call allocates its own working state, so
/// one distributor can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct WeightDistributor {
    config: DistributorConfig,
}

impl WeightDistributor {
    /// Distributor with the default sender floor (1)
    pub fn new() -> Self {
        Self::default()
    }

    /// Distributor with a custom config
    pub fn with_config(config: DistributorConfig) -> ScaleResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current config
    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    /// Scale and redistribute, returning raw weights
    pub fn compute_scaled_weights(
        &self,
        table: &WeightedTable,
        rules: &[TransferRule],
        factors: &ScalingFactors,
    ) -> ScaleResult<Vec<u64>> {
        compute_scaled_weights(table, rules, factors, self.config.minimum_sender_weight)
    }

    /// Scale and redistribute, returning the effective table
    pub fn compute_effective_table(
        &self,
        table: &WeightedTable,
        rules: &[TransferRule],
        factors: &ScalingFactors,
    ) -> ScaleResult<WeightedTable> {
        let weights = self.compute_scaled_weights(table, rules, factors)?;
        table.with_weights(&weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::ScalingMethod;
    use crate::table::WeightedEntry;

    fn stake_factors(factor: u64) -> ScalingFactors {
        ScalingFactors::new().with_factor(ScalingMethod::StakeMultiplier, factor)
    }

    #[test]
    fn test_scale_and_surplus() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 100, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 50),
            WeightedEntry::new("C", 10, ScalingMethod::TotalBet),
        ])
        .unwrap();
        let factors = stake_factors(2).with_factor(ScalingMethod::TotalBet, 3);

        let scaled = scale_and_surplus(&table, &factors).unwrap();
        assert_eq!(scaled.weights, vec![200, 50, 30]);
        assert_eq!(scaled.surplus, 120);
        assert_eq!(scaled.id_index["C"], 2);
        assert_eq!(scaled.total_weight(), 280);
    }

    #[test]
    fn test_zero_surplus_ignores_rules() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 100, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 50),
        ])
        .unwrap();
        // Invalid rule is never looked at
        let rules = vec![TransferRule::new("B", "A", 1)];
        let weights =
            compute_scaled_weights(&table, &rules, &ScalingFactors::new(), 1).unwrap();
        assert_eq!(weights, vec![100, 50]);
    }

    #[test]
    fn test_pool_exhausted_by_one_unit() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 100, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 50),
        ])
        .unwrap();
        let rules = vec![TransferRule::new("B", "A", 2)];

        let result = compute_scaled_weights(&table, &rules, &stake_factors(2), 1);
        assert_eq!(result, Err(ScaleError::InsufficientWeight { remaining: 1 }));
    }

    #[test]
    fn test_single_rule_absorbs_everything() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 100, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 50),
            WeightedEntry::fixed("C", 1000),
        ])
        .unwrap();
        let rules = vec![TransferRule::new("B", "C", 2)];

        let weights = compute_scaled_weights(&table, &rules, &stake_factors(2), 1).unwrap();
        assert_eq!(weights, vec![200, 150, 800]);
    }

    #[test]
    fn test_no_rules() {
        let table =
            WeightedTable::new(vec![WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier)])
                .unwrap();
        let result = compute_scaled_weights(&table, &[], &stake_factors(4), 1);
        assert_eq!(result, Err(ScaleError::NoRedistributionRules { surplus: 30 }));
    }

    #[test]
    fn test_unknown_ids_and_self_transfer_skipped() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 100),
        ])
        .unwrap();
        let rules = vec![
            TransferRule::new("GHOST", "B", 2),
            TransferRule::new("A", "MISSING", 2),
            TransferRule::new("B", "B", 2),
            TransferRule::new("A", "B", 2),
        ];

        // surplus 10: last rule moves 20 from B, gives 10 to A
        let weights = compute_scaled_weights(&table, &rules, &stake_factors(2), 1).unwrap();
        assert_eq!(weights, vec![30, 80]);
    }

    #[test]
    fn test_invalid_transfer_factor_rejected() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 100),
        ])
        .unwrap();
        let rules = vec![TransferRule::new("A", "B", 1), TransferRule::new("A", "B", 2)];
        let result = compute_scaled_weights(&table, &rules, &stake_factors(2), 1);
        assert_eq!(
            result,
            Err(ScaleError::InvalidTransferFactor {
                receiver: "A".into(),
                sender: "B".into(),
                factor: 1,
            })
        );
    }

    #[test]
    fn test_unreached_invalid_rule_ignored() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 100),
        ])
        .unwrap();
        // First rule absorbs all 10 units; the walk stops before the bad one
        let rules = vec![TransferRule::new("A", "B", 2), TransferRule::new("A", "B", 1)];
        let weights = compute_scaled_weights(&table, &rules, &stake_factors(2), 1).unwrap();
        assert_eq!(weights, vec![30, 80]);
    }

    #[test]
    fn test_invalid_rule_with_unknown_ids_ignored() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 100),
        ])
        .unwrap();
        let rules = vec![
            TransferRule::new("GHOST", "NOPE", 0),
            TransferRule::new("A", "B", 2),
        ];
        let weights = compute_scaled_weights(&table, &rules, &stake_factors(2), 1).unwrap();
        assert_eq!(weights, vec![30, 80]);
    }

    #[test]
    fn test_invalid_rule_on_floored_sender_ignored() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 100),
            WeightedEntry::fixed("EMPTY", 1),
        ])
        .unwrap();
        let rules = vec![
            TransferRule::new("A", "EMPTY", 1),
            TransferRule::new("A", "B", 2),
        ];
        let weights = compute_scaled_weights(&table, &rules, &stake_factors(2), 1).unwrap();
        assert_eq!(weights, vec![30, 80, 1]);
    }

    #[test]
    fn test_receiver_overflow() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 10, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("BIG", u64::MAX - 5),
            WeightedEntry::fixed("B", 1000),
        ])
        .unwrap();
        // 10 surplus wants to add 10 to BIG, which has room for 5
        let rules = vec![TransferRule::new("BIG", "B", 2)];
        let result = compute_scaled_weights(&table, &rules, &stake_factors(2), 1);
        assert_eq!(result, Err(ScaleError::WeightOverflow { id: "BIG".into() }));
        assert!(result.unwrap_err().is_arithmetic_fault());
    }

    #[test]
    fn test_zero_scaling_factor_rejected() {
        let table =
            WeightedTable::new(vec![WeightedEntry::new("A", 10, ScalingMethod::TotalBet)])
                .unwrap();
        let factors = ScalingFactors::new().with_factor(ScalingMethod::TotalBet, 0);
        let result = compute_scaled_weights(&table, &[], &factors, 1);
        assert_eq!(
            result,
            Err(ScaleError::InvalidScalingFactor {
                method: ScalingMethod::TotalBet,
                factor: 0
            })
        );
    }

    #[test]
    fn test_scaling_overflow() {
        let table = WeightedTable::new(vec![WeightedEntry::new(
            "A",
            u64::MAX / 2 + 1,
            ScalingMethod::StakeMultiplier,
        )])
        .unwrap();
        let result = scale_and_surplus(&table, &stake_factors(2));
        assert_eq!(result, Err(ScaleError::WeightOverflow { id: "A".into() }));
    }

    #[test]
    fn test_distributor_effective_table() {
        let table = WeightedTable::new(vec![
            WeightedEntry::new("A", 100, ScalingMethod::StakeMultiplier),
            WeightedEntry::fixed("B", 50),
            WeightedEntry::fixed("C", 1000),
        ])
        .unwrap();
        let rules = vec![TransferRule::new("B", "C", 2)];

        let distributor = WeightDistributor::new();
        assert_eq!(distributor.config().minimum_sender_weight, 1);

        let effective = distributor
            .compute_effective_table(&table, &rules, &stake_factors(2))
            .unwrap();
        assert_eq!(effective.weight_at(1).unwrap(), 150);
        assert_eq!(effective.total_weight(), table.total_weight());
    }

    #[test]
    fn test_distributor_rejects_bad_config() {
        let config = DistributorConfig::with_minimum_sender_weight(u64::MAX);
        assert!(WeightDistributor::with_config(config).is_err());
    }
}
