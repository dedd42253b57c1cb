//! Error type shared by the grid, field, rule engine and estimator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutomataError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AutomataError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("grid is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("invalid cell state {state} at index {index} (rule allows 0..={max})")]
    InvalidState { state: u8, index: usize, max: u8 },

    #[error("insufficient data for dimension fit: {usable} usable points, need at least 2")]
    InsufficientData { usable: usize },

    #[error("random source produced {0}, expected a value in [0, 1)")]
    RandomSource(f64),
}

impl AutomataError {
    /// Shorthand for building a [`AutomataError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        AutomataError::Configuration(msg.into())
    }

    /// True for every error caused by bad input rather than by the run itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AutomataError::Configuration(_)
                | AutomataError::DimensionMismatch { .. }
                | AutomataError::InvalidState { .. }
        )
    }
}
