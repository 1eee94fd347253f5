//! Design matrix container with named columns and resolved column roles.
//!
//! Purpose
//! -------
//! Hold the n×k covariate matrix consumed by every likelihood in the crate,
//! together with one name per column. Validation happens once, at
//! construction, so kernels and samplers can assume finite entries.
//!
//! Key behaviors
//! -------------
//! - [`DesignMatrix::new`] rejects empty matrices, non-finite entries,
//!   mismatched or duplicated column names.
//! - Named roles (treatment dummy, price coefficient) are resolved into
//!   column indices by [`DesignMatrix::with_treatment_column`] and
//!   [`DesignMatrix::with_price_column`]; downstream code uses the indices
//!   and never matches column names at run time.
//! - [`DesignMatrix::linear_predictor`] computes `Xβ` for any parameter
//!   vector of length `k`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values.nrows() > 0`, `values.ncols() > 0`, `names.len() == ncols`.
//! - All entries are finite.
//! - When set, `roles.treatment` points at a column containing only 0.0 and
//!   1.0.
//!
//! Conventions
//! -----------
//! - Rows are observational units (for choice data: one row per
//!   alternative); categorical levels arrive already one-hot encoded with a
//!   reference level dropped.
use crate::data::errors::{DataError, DataResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashSet;

/// Column roles resolved once at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnRoles {
    /// Index of the 0/1 treatment dummy, if the design has one.
    pub treatment: Option<usize>,
    /// Index of the price/scale coefficient, if the design has one.
    pub price: Option<usize>,
}

/// Validated n×k design matrix with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    values: Array2<f64>,
    names: Vec<String>,
    roles: ColumnRoles,
}

impl DesignMatrix {
    /// Construct a validated design matrix.
    ///
    /// # Errors
    /// - [`DataError::EmptyDesign`] when there are no rows or no columns.
    /// - [`DataError::ColumnNameMismatch`] when `names.len() != ncols`.
    /// - [`DataError::DuplicateColumnName`] for a repeated name.
    /// - [`DataError::NonFiniteDesign`] for the first NaN/±inf entry.
    pub fn new(values: Array2<f64>, names: Vec<String>) -> DataResult<Self> {
        let (rows, cols) = values.dim();
        if rows == 0 || cols == 0 {
            return Err(DataError::EmptyDesign { rows, cols });
        }
        if names.len() != cols {
            return Err(DataError::ColumnNameMismatch { expected: cols, found: names.len() });
        }
        let mut seen = HashSet::with_capacity(cols);
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(DataError::DuplicateColumnName { name: name.clone() });
            }
        }
        if let Some(((row, col), &value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(DataError::NonFiniteDesign { row, col, value });
        }
        Ok(Self { values, names, roles: ColumnRoles::default() })
    }

    /// Construct a design matrix with generated column names `x0, x1, ...`.
    ///
    /// # Errors
    /// Same as [`DesignMatrix::new`].
    pub fn from_unnamed(values: Array2<f64>) -> DataResult<Self> {
        let names = (0..values.ncols()).map(|j| format!("x{j}")).collect();
        Self::new(values, names)
    }

    /// Resolve the 0/1 treatment dummy by name.
    ///
    /// # Errors
    /// - [`DataError::UnknownColumn`] if no column carries `name`.
    /// - [`DataError::InvalidTreatmentColumn`] if the column is not 0/1.
    pub fn with_treatment_column(mut self, name: &str) -> DataResult<Self> {
        let index = self.require_column(name)?;
        for (row, &value) in self.values.column(index).iter().enumerate() {
            if value != 0.0 && value != 1.0 {
                return Err(DataError::InvalidTreatmentColumn { row, value });
            }
        }
        self.roles.treatment = Some(index);
        Ok(self)
    }

    /// Resolve the price/scale coefficient column by name.
    ///
    /// # Errors
    /// - [`DataError::UnknownColumn`] if no column carries `name`.
    pub fn with_price_column(mut self, name: &str) -> DataResult<Self> {
        self.roles.price = Some(self.require_column(name)?);
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn roles(&self) -> ColumnRoles {
        self.roles
    }

    /// Position of the column called `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Linear predictor `Xβ`.
    ///
    /// The caller guarantees `beta.len() == self.ncols()`; model `check`
    /// hooks enforce this before any evaluation.
    pub fn linear_predictor(&self, beta: ArrayView1<'_, f64>) -> Array1<f64> {
        self.values.dot(&beta)
    }

    fn require_column(&self, name: &str) -> DataResult<usize> {
        self.column_index(name).ok_or_else(|| DataError::UnknownColumn { name: name.to_string() })
    }
}
