//! Distribution report — per-entry view of how weight moved

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};
use crate::scaling::{ScalingFactors, ScalingMethod};
use crate::table::WeightedTable;

/// One table entry before and after distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub scaling_method: ScalingMethod,
    pub base_weight: u64,
    pub scaled_weight: u128,
    pub final_weight: u64,
}

impl ReportRow {
    /// Weight gained (+) or given up (-) during redistribution
    pub fn delta(&self) -> i128 {
        self.final_weight as i128 - self.scaled_weight as i128
    }
}

/// Report over a whole table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub rows: Vec<ReportRow>,
}

impl DistributionReport {
    /// Build a report from a table, the factors used and the final weights
    pub fn build(
        table: &WeightedTable,
        factors: &ScalingFactors,
        final_weights: &[u64],
    ) -> ScaleResult<Self> {
        if final_weights.len() != table.len() {
            return Err(ScaleError::LengthMismatch {
                expected: table.len(),
                actual: final_weights.len(),
            });
        }

        let rows = table
            .iter()
            .zip(final_weights)
            .map(|(entry, &final_weight)| ReportRow {
                id: entry.id.clone(),
                scaling_method: entry.scaling_method,
                base_weight: entry.weight,
                scaled_weight: factors.factor_for(entry.scaling_method) as u128
                    * entry.weight as u128,
                final_weight,
            })
            .collect();

        Ok(Self { rows })
    }

    /// Sum of base weights
    pub fn total_base(&self) -> u128 {
        self.rows.iter().map(|r| r.base_weight as u128).sum()
    }

    /// Sum of scaled weights
    pub fn total_scaled(&self) -> u128 {
        self.rows.iter().map(|r| r.scaled_weight).sum()
    }

    /// Sum of final weights
    pub fn total_final(&self) -> u128 {
        self.rows.iter().map(|r| r.final_weight as u128).sum()
    }

    /// Rows whose weight changed during redistribution
    pub fn changed(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|r| r.delta() != 0)
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id_width = self
            .rows
            .iter()
            .map(|r| r.id.len())
            .max()
            .unwrap_or(0)
            .max("TOTAL".len());

        writeln!(
            f,
            "{:<id_width$}  {:<16}  {:>12}  {:>12}  {:>12}  {:>12}",
            "ID", "SCALING", "BASE", "SCALED", "FINAL", "DELTA"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<id_width$}  {:<16}  {:>12}  {:>12}  {:>12}  {:>+12}",
                row.id,
                format!("{:?}", row.scaling_method),
                row.base_weight,
                row.scaled_weight,
                row.final_weight,
                row.delta()
            )?;
        }
        write!(
            f,
            "{:<id_width$}  {:<16}  {:>12}  {:>12}  {:>12}",
            "TOTAL",
            "",
            self.total_base(),
            self.total_scaled(),
            self.total_final()
        )
    }
}
