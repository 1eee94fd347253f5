//! Response containers: Poisson counts and grouped discrete choices.
//!
//! Purpose
//! -------
//! Validate responses once and precompute what the kernels reuse on every
//! evaluation: log-factorials for counts, materialized choice-set groups for
//! choices. Paired containers ([`CountData`], [`ChoiceDataset`]) bind a
//! response to its [`DesignMatrix`] and enforce matching row counts.
//!
//! Invariants & assumptions
//! ------------------------
//! - Counts are finite, non-negative and integer-valued.
//! - Chosen indicators are exactly 0.0 or 1.0; each group has exactly one
//!   chosen row, at least two rows, and every group has the same size.
//! - Groups appear in order of first appearance of their key; rows inside a
//!   group keep their original order.
use crate::data::{
    design::DesignMatrix,
    errors::{DataError, DataResult},
};
use ndarray::{Array1, ArrayView1};
use statrs::function::gamma::ln_gamma;
use std::collections::HashMap;

/// Non-negative integer counts with cached `ln(y!)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountResponse {
    counts: Array1<f64>,
    log_factorials: Array1<f64>,
}

impl CountResponse {
    /// Validate a count vector stored as `f64`.
    ///
    /// # Errors
    /// - [`DataError::EmptyResponse`] for an empty vector.
    /// - [`DataError::NonFiniteCount`] for NaN/±inf.
    /// - [`DataError::InvalidCount`] for negative or fractional values.
    pub fn new(counts: Array1<f64>) -> DataResult<Self> {
        if counts.is_empty() {
            return Err(DataError::EmptyResponse);
        }
        for (index, &value) in counts.iter().enumerate() {
            if !value.is_finite() {
                return Err(DataError::NonFiniteCount { index, value });
            }
            if value < 0.0 || value.fract() != 0.0 {
                return Err(DataError::InvalidCount { index, value });
            }
        }
        let log_factorials = counts.mapv(|y| ln_gamma(y + 1.0));
        Ok(Self { counts, log_factorials })
    }

    /// Build from integer counts.
    ///
    /// # Errors
    /// [`DataError::EmptyResponse`] when `counts` is empty.
    pub fn from_counts(counts: &[u64]) -> DataResult<Self> {
        Self::new(counts.iter().map(|&c| c as f64).collect())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> ArrayView1<'_, f64> {
        self.counts.view()
    }

    pub fn log_factorials(&self) -> ArrayView1<'_, f64> {
        self.log_factorials.view()
    }

    /// Sample mean of the counts.
    pub fn mean(&self) -> f64 {
        self.counts.sum() / self.counts.len() as f64
    }
}

/// One choice-set group: its key, member rows and the chosen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    pub key: u64,
    pub rows: Vec<usize>,
    pub chosen: usize,
}

impl ChoiceSet {
    /// Position of the chosen row inside `rows`.
    pub fn chosen_position(&self) -> usize {
        self.rows.iter().position(|&r| r == self.chosen).unwrap_or(0)
    }
}

/// Binary chosen indicators grouped into validated choice sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceData {
    chosen: Array1<f64>,
    group_keys: Vec<u64>,
    sets: Vec<ChoiceSet>,
    alternatives: usize,
}

impl ChoiceData {
    /// Validate indicators and group keys and materialize the choice sets.
    ///
    /// # Errors
    /// - [`DataError::EmptyResponse`] for an empty indicator vector.
    /// - [`DataError::GroupKeyLengthMismatch`] when key and indicator lengths
    ///   differ.
    /// - [`DataError::NonBinaryChoice`] for indicators other than 0/1.
    /// - [`DataError::NoChosenAlternative`] /
    ///   [`DataError::MultipleChosenAlternatives`] when a group does not have
    ///   exactly one chosen row.
    /// - [`DataError::DegenerateChoiceSet`] for groups with fewer than two rows.
    /// - [`DataError::InconsistentGroupSize`] when a group's size differs from
    ///   the first group's.
    pub fn new(chosen: Array1<f64>, group_keys: Vec<u64>) -> DataResult<Self> {
        if chosen.is_empty() {
            return Err(DataError::EmptyResponse);
        }
        if group_keys.len() != chosen.len() {
            return Err(DataError::GroupKeyLengthMismatch {
                expected: chosen.len(),
                found: group_keys.len(),
            });
        }
        if let Some((index, &value)) =
            chosen.iter().enumerate().find(|(_, &v)| v != 0.0 && v != 1.0)
        {
            return Err(DataError::NonBinaryChoice { index, value });
        }

        let mut sets = Vec::new();
        for (key, rows) in group_rows(&group_keys) {
            let picked: Vec<usize> = rows.iter().copied().filter(|&r| chosen[r] == 1.0).collect();
            let chosen_row = match picked.as_slice() {
                [] => return Err(DataError::NoChosenAlternative { group: key }),
                [row] => *row,
                many => {
                    return Err(DataError::MultipleChosenAlternatives {
                        group: key,
                        count: many.len(),
                    })
                }
            };
            sets.push(ChoiceSet { key, rows, chosen: chosen_row });
        }

        let alternatives = sets[0].rows.len();
        for set in &sets {
            if set.rows.len() < 2 {
                return Err(DataError::DegenerateChoiceSet { group: set.key, size: set.rows.len() });
            }
            if set.rows.len() != alternatives {
                return Err(DataError::InconsistentGroupSize {
                    group: set.key,
                    expected: alternatives,
                    found: set.rows.len(),
                });
            }
        }

        Ok(Self { chosen, group_keys, sets, alternatives })
    }

    /// Build from a chosen row index per group, for groups laid out as
    /// consecutive blocks of `alternatives` rows.
    ///
    /// # Errors
    /// Same as [`ChoiceData::new`].
    pub fn from_blocks(chosen_positions: &[usize], alternatives: usize) -> DataResult<Self> {
        let n = chosen_positions.len() * alternatives;
        let mut chosen = Array1::zeros(n);
        let mut keys = Vec::with_capacity(n);
        for (g, &pos) in chosen_positions.iter().enumerate() {
            if pos < alternatives {
                chosen[g * alternatives + pos] = 1.0;
            }
            keys.extend(std::iter::repeat(g as u64).take(alternatives));
        }
        Self::new(chosen, keys)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn chosen(&self) -> ArrayView1<'_, f64> {
        self.chosen.view()
    }

    pub fn group_keys(&self) -> &[u64] {
        &self.group_keys
    }

    pub fn sets(&self) -> &[ChoiceSet] {
        &self.sets
    }

    pub fn n_groups(&self) -> usize {
        self.sets.len()
    }

    /// Number of alternatives shared by every group.
    pub fn alternatives(&self) -> usize {
        self.alternatives
    }
}

/// Group row indices by key, in order of first appearance.
pub(crate) fn group_rows(keys: &[u64]) -> Vec<(u64, Vec<usize>)> {
    let mut slot: HashMap<u64, usize> = HashMap::new();
    let mut groups: Vec<(u64, Vec<usize>)> = Vec::new();
    for (row, &key) in keys.iter().enumerate() {
        let idx = *slot.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(row);
    }
    groups
}

/// Design matrix paired with Poisson counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CountData {
    pub design: DesignMatrix,
    pub response: CountResponse,
}

impl CountData {
    /// # Errors
    /// [`DataError::RowCountMismatch`] when the row counts differ.
    pub fn new(design: DesignMatrix, response: CountResponse) -> DataResult<Self> {
        if design.nrows() != response.len() {
            return Err(DataError::RowCountMismatch {
                design_rows: design.nrows(),
                response_len: response.len(),
            });
        }
        Ok(Self { design, response })
    }
}

/// Design matrix (one row per alternative) paired with grouped choices.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceDataset {
    pub design: DesignMatrix,
    pub choices: ChoiceData,
}

impl ChoiceDataset {
    /// # Errors
    /// [`DataError::RowCountMismatch`] when the row counts differ.
    pub fn new(design: DesignMatrix, choices: ChoiceData) -> DataResult<Self> {
        if design.nrows() != choices.len() {
            return Err(DataError::RowCountMismatch {
                design_rows: design.nrows(),
                response_len: choices.len(),
            });
        }
        Ok(Self { design, choices })
    }
}
