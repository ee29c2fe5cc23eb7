use thiserror::Error;

use crate::data::DataError;

/// Crate-wide error type.
///
/// `DimensionMismatch` and `MalformedConstruction` are contract violations:
/// an operation that hits one computes nothing and hands the error back to
/// the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// Operand shapes are incompatible for the named operation.
    #[error("dimension mismatch in {op}: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Backing buffer length does not equal rows × cols.
    #[error("malformed matrix: {len} values cannot fill a {rows}x{cols} matrix")]
    MalformedConstruction { rows: usize, cols: usize, len: usize },

    /// Network sizing or training hyperparameters are unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Loading a dataset failed before training started.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A concurrent training worker panicked while holding the update lock.
    #[error("a training worker panicked while holding the network lock")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Error {
        Error::DimensionMismatch { op, left, right }
    }
}
