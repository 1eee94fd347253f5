//! Errors for the input contract (design matrices, counts, choice sets).
//!
//! Every variant names the invariant that failed and where, so a caller can
//! point at the offending row, column, or choice-set group directly.

/// Result alias for data-construction paths that may produce [`DataError`].
pub type DataResult<T> = Result<T, DataError>;

/// Input-contract violations detected while building validated data containers.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Design matrix ----
    /// Design matrix has no rows or no columns.
    EmptyDesign { rows: usize, cols: usize },

    /// Number of column names does not match the number of columns.
    ColumnNameMismatch { expected: usize, found: usize },

    /// Two columns share the same name.
    DuplicateColumnName { name: String },

    /// A design entry is NaN/±inf.
    NonFiniteDesign { row: usize, col: usize, value: f64 },

    /// A named column role refers to a column that does not exist.
    UnknownColumn { name: String },

    /// The treatment column must be a 0/1 dummy.
    InvalidTreatmentColumn { row: usize, value: f64 },

    // ---- Responses ----
    /// Response vector is empty.
    EmptyResponse,

    /// A count is NaN/±inf.
    NonFiniteCount { index: usize, value: f64 },

    /// A count is negative or not integer-valued.
    InvalidCount { index: usize, value: f64 },

    /// Design rows and response length disagree.
    RowCountMismatch { design_rows: usize, response_len: usize },

    // ---- Choice sets ----
    /// Group key vector length differs from the chosen-indicator length.
    GroupKeyLengthMismatch { expected: usize, found: usize },

    /// A chosen indicator is not exactly 0 or 1.
    NonBinaryChoice { index: usize, value: f64 },

    /// A group has no chosen alternative.
    NoChosenAlternative { group: u64 },

    /// A group has more than one chosen alternative.
    MultipleChosenAlternatives { group: u64, count: usize },

    /// A group's size differs from the size of the first group.
    InconsistentGroupSize { group: u64, expected: usize, found: usize },

    /// Choice sets need at least two alternatives.
    DegenerateChoiceSet { group: u64, size: usize },

    // ---- Simulation ----
    /// Coefficient vector length differs from the number of design columns.
    CoefficientLengthMismatch { expected: usize, found: usize },

    /// A simulated Poisson rate is not finite and positive.
    InvalidSimulatedRate { row: usize, rate: f64 },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Design matrix ----
            DataError::EmptyDesign { rows, cols } => {
                write!(f, "Design matrix must be non-empty, found {rows} rows and {cols} columns")
            }
            DataError::ColumnNameMismatch { expected, found } => {
                write!(f, "Column name count mismatch: expected {expected}, found {found}")
            }
            DataError::DuplicateColumnName { name } => {
                write!(f, "Duplicate column name '{name}'")
            }
            DataError::NonFiniteDesign { row, col, value } => {
                write!(f, "Non-finite design entry at ({row}, {col}): {value}")
            }
            DataError::UnknownColumn { name } => {
                write!(f, "Unknown column '{name}'")
            }
            DataError::InvalidTreatmentColumn { row, value } => {
                write!(f, "Treatment column must be 0/1, found {value} at row {row}")
            }

            // ---- Responses ----
            DataError::EmptyResponse => write!(f, "Response vector is empty"),
            DataError::NonFiniteCount { index, value } => {
                write!(f, "Non-finite count at index {index}: {value}")
            }
            DataError::InvalidCount { index, value } => {
                write!(f, "Count at index {index} must be a non-negative integer, found {value}")
            }
            DataError::RowCountMismatch { design_rows, response_len } => {
                write!(
                    f,
                    "Design has {design_rows} rows but the response has {response_len} entries"
                )
            }

            // ---- Choice sets ----
            DataError::GroupKeyLengthMismatch { expected, found } => {
                write!(f, "Group key length mismatch: expected {expected}, found {found}")
            }
            DataError::NonBinaryChoice { index, value } => {
                write!(f, "Chosen indicator at index {index} must be 0 or 1, found {value}")
            }
            DataError::NoChosenAlternative { group } => {
                write!(f, "group {group} has 0 chosen alternatives")
            }
            DataError::MultipleChosenAlternatives { group, count } => {
                write!(f, "group {group} has {count} chosen alternatives")
            }
            DataError::InconsistentGroupSize { group, expected, found } => {
                write!(f, "group {group} has {found} alternatives, expected {expected}")
            }
            DataError::DegenerateChoiceSet { group, size } => {
                write!(f, "group {group} has {size} alternatives, at least 2 are required")
            }

            // ---- Simulation ----
            DataError::CoefficientLengthMismatch { expected, found } => {
                write!(f, "Coefficient length mismatch: expected {expected}, found {found}")
            }
            DataError::InvalidSimulatedRate { row, rate } => {
                write!(f, "Simulated rate at row {row} must be finite and positive, found {rate}")
            }
        }
    }
}
