use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loss::mae::MaeLoss;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Error metrics for regression-style targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub mae: f64,
    pub mse: f64,
}

/// Percentage of rows whose predicted class matches the target class.
///
/// Multi-column rows are decoded with argmax. A single output column is read
/// as a binary label thresholded at 0.5.
pub fn accuracy(network: &Network, inputs: &Matrix, targets: &Matrix) -> Result<f64> {
    let predicted = predict_checked(network, inputs, targets)?;
    let n = predicted.rows();
    if n == 0 {
        return Ok(0.0);
    }
    let correct = (0..n)
        .filter(|&i| decode_class(predicted.row(i)) == decode_class(targets.row(i)))
        .count();
    Ok(correct as f64 / n as f64 * 100.0)
}

/// Mean absolute and mean squared error of the raw outputs.
pub fn regression_errors(network: &Network, inputs: &Matrix, targets: &Matrix) -> Result<RegressionReport> {
    let predicted = predict_checked(network, inputs, targets)?;
    Ok(RegressionReport {
        mae: MaeLoss::loss(&predicted, targets)?,
        mse: MseLoss::loss(&predicted, targets)?,
    })
}

/// Mean squared error over every output element.
pub fn mean_squared_error(network: &Network, inputs: &Matrix, targets: &Matrix) -> Result<f64> {
    let predicted = predict_checked(network, inputs, targets)?;
    MseLoss::loss(&predicted, targets)
}

fn predict_checked(network: &Network, inputs: &Matrix, targets: &Matrix) -> Result<Matrix> {
    let predicted = network.predict(inputs)?;
    if predicted.dims() != targets.dims() {
        return Err(Error::mismatch("evaluate", predicted.dims(), targets.dims()));
    }
    Ok(predicted)
}

fn decode_class(row: &[f64]) -> usize {
    match row {
        [single] => usize::from(*single >= 0.5),
        _ => argmax(row),
    }
}

/// Index of the maximum element in a slice; ties keep the first index.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &x)| {
            if x > max { (i, x) } else { (best, max) }
        })
        .0
}
