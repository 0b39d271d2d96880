//! Weight transfer rules and the transfer-amount calculation

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// A weight-transfer channel from a sender entry to a receiver entry
///
/// The receiver gains 1 unit of weight for every `transfer_factor` units the
/// sender loses. Callers guarantee that the receiver's prize value equals
/// `transfer_factor` times the sender's, so the move keeps the table's
/// expected payout unchanged. The distributor relies on that but never
/// checks it; see [`TransferRule::matches_prize_ratio`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRule {
    /// Entry that gains weight
    pub receiver_id: String,
    /// Entry that gives up weight
    pub sender_id: String,
    /// Sender weight given up per unit of receiver weight gained
    pub transfer_factor: u64,
}

impl TransferRule {
    /// Create a rule
    pub fn new(
        receiver_id: impl Into<String>,
        sender_id: impl Into<String>,
        transfer_factor: u64,
    ) -> Self {
        Self {
            receiver_id: receiver_id.into(),
            sender_id: sender_id.into(),
            transfer_factor,
        }
    }

    /// Reject factors that make the transfer math meaningless (<= 1)
    pub fn validate(&self) -> ScaleResult<()> {
        if self.transfer_factor <= 1 {
            return Err(ScaleError::InvalidTransferFactor {
                receiver: self.receiver_id.clone(),
                sender: self.sender_id.clone(),
                factor: self.transfer_factor,
            });
        }
        Ok(())
    }

    /// Check the prize-value invariant for this rule
    ///
    /// `receiver_value == transfer_factor * sender_value`, evaluated without
    /// overflow. Values are in whatever unit the paytable uses (credits,
    /// bet multiples).
    pub fn matches_prize_ratio(&self, receiver_value: u64, sender_value: u64) -> bool {
        receiver_value as u128 == self.transfer_factor as u128 * sender_value as u128
    }
}

/// Amounts moved by one application of a rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAmounts {
    /// Weight removed from the sender
    pub send: u64,
    /// Weight added to the receiver
    pub receive: u64,
    /// Surplus absorbed (`send - receive`)
    pub adjusted: u64,
}

impl TransferAmounts {
    /// Nothing to move
    pub fn is_empty(&self) -> bool {
        self.adjusted == 0
    }
}

/// Compute how much weight one rule moves.
///
/// * `extra_weight` - surplus still to absorb
/// * `pool_weight` - sender's current weight
/// * `minimum_sender_weight` - floor the sender may not drop below
/// * `transfer_factor` - must be > 1
///
/// Each unit of adjustment takes `transfer_factor` from the sender, gives 1
/// to the receiver and absorbs `transfer_factor - 1` surplus. The adjustment
/// is the largest count that neither drops the sender below its floor nor
/// absorbs more than `extra_weight`.
///
/// # Errors
/// `TransferFactorTooSmall` when `transfer_factor <= 1`. A pool at or below
/// the floor yields empty amounts.
pub fn calculate_weight_to_take(
    extra_weight: u64,
    pool_weight: u64,
    minimum_sender_weight: u64,
    transfer_factor: u64,
) -> ScaleResult<TransferAmounts> {
    if transfer_factor <= 1 {
        return Err(ScaleError::TransferFactorTooSmall(transfer_factor));
    }

    let weight_shift_factor = transfer_factor - 1;
    let maximum_adjustment_in_extra = extra_weight / weight_shift_factor;
    let available_sender_weight = pool_weight.saturating_sub(minimum_sender_weight);
    let base_value = available_sender_weight / transfer_factor;

    // base_value is the pool cap expressed as an adjustment count
    let adjustment = maximum_adjustment_in_extra.min(base_value);

    Ok(TransferAmounts {
        send: adjustment * transfer_factor,
        receive: adjustment,
        adjusted: adjustment * weight_shift_factor,
    })
}
