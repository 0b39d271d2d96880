//! Weighted prize tables

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};
use crate::scaling::ScalingMethod;

/// A single weighted table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEntry {
    /// Prize/symbol id, unique within its table
    pub id: String,
    /// Base weight
    pub weight: u64,
    /// Which bet-derived factor rescales this weight
    #[serde(default)]
    pub scaling_method: ScalingMethod,
}

impl WeightedEntry {
    /// Create an entry
    pub fn new(id: impl Into<String>, weight: u64, scaling_method: ScalingMethod) -> Self {
        Self {
            id: id.into(),
            weight,
            scaling_method,
        }
    }

    /// Create an entry that never scales
    pub fn fixed(id: impl Into<String>, weight: u64) -> Self {
        Self::new(id, weight, ScalingMethod::None)
    }
}

/// Ordered, immutable weighted table
///
/// Entry order is significant: the index of an entry is its identity in the
/// weight arrays produced by the distributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightedTable {
    entries: Vec<WeightedEntry>,
}

impl WeightedTable {
    /// Create a table, rejecting duplicate ids
    pub fn new(entries: Vec<WeightedEntry>) -> ScaleResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(ScaleError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id at index
    pub fn id_at(&self, index: usize) -> ScaleResult<&str> {
        self.entry(index).map(|e| e.id.as_str())
    }

    /// Base weight at index
    pub fn weight_at(&self, index: usize) -> ScaleResult<u64> {
        self.entry(index).map(|e| e.weight)
    }

    /// Scaling method at index
    pub fn scaling_method_at(&self, index: usize) -> ScaleResult<ScalingMethod> {
        self.entry(index).map(|e| e.scaling_method)
    }

    /// Entry at index
    pub fn entry(&self, index: usize) -> ScaleResult<&WeightedEntry> {
        self.entries.get(index).ok_or(ScaleError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// All entries in table order
    pub fn entries(&self) -> &[WeightedEntry] {
        &self.entries
    }

    /// Iterate entries in table order
    pub fn iter(&self) -> std::slice::Iter<'_, WeightedEntry> {
        self.entries.iter()
    }

    /// Index of an id (linear scan)
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Sum of base weights
    pub fn total_weight(&self) -> u128 {
        self.entries.iter().map(|e| e.weight as u128).sum()
    }

    /// Pair new weights with this table's ids and methods
    ///
    /// Used to turn the distributor's output back into the effective table.
    pub fn with_weights(&self, weights: &[u64]) -> ScaleResult<WeightedTable> {
        if weights.len() != self.entries.len() {
            return Err(ScaleError::LengthMismatch {
                expected: self.entries.len(),
                actual: weights.len(),
            });
        }

        let entries = self
            .entries
            .iter()
            .zip(weights)
            .map(|(entry, &weight)| WeightedEntry {
                weight,
                ..entry.clone()
            })
            .collect();

        Ok(Self { entries })
    }
}

impl<'de> Deserialize<'de> for WeightedTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            entries: Vec<WeightedEntry>,
        }

        let raw = Raw::deserialize(deserializer)?;
        WeightedTable::new(raw.entries).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a WeightedTable {
    type Item = &'a WeightedEntry;
    type IntoIter = std::slice::Iter<'a, WeightedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
