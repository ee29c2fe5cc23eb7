pub mod builtin;
pub mod csv;

use thiserror::Error;

use crate::math::matrix::Matrix;

pub use csv::{load_delimited, parse_delimited, CsvOptions};

/// Feature rows and their targets, row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Matrix,
    pub targets: Matrix,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn feature_count(&self) -> usize {
        self.inputs.cols()
    }

    pub fn target_count(&self) -> usize {
        self.targets.cols()
    }
}

/// Failures while turning delimited text into a `Dataset`.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row}, column {col}: '{value}' is not a valid number")]
    Parse { row: usize, col: usize, value: String },

    #[error("row {row}: expected {expected} columns, got {found}")]
    Ragged { row: usize, expected: usize, found: usize },

    #[error("row {row}: need at least {needed} columns for {targets} target column(s), got {found}")]
    TooFewColumns { row: usize, needed: usize, targets: usize, found: usize },

    #[error("no data rows after parsing")]
    Empty,

    #[error("invalid loader options: {0}")]
    Options(String),
}
