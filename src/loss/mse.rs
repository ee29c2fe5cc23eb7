use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Squared-error loss, the only objective this network trains against.
pub struct MseLoss;

impl MseLoss {
    /// Σ (predicted − expected)² over every element.
    pub fn sum_squared(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        Ok(MseLoss::derivative(predicted, expected)?
            .as_slice()
            .iter()
            .map(|d| d * d)
            .sum())
    }

    /// Scalar MSE: mean((predicted - expected)²) over all elements.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        let n = predicted.as_slice().len();
        if n == 0 {
            return Err(Error::mismatch("mse", predicted.dims(), expected.dims()));
        }
        Ok(MseLoss::sum_squared(predicted, expected)? / n as f64)
    }

    /// Output error: predicted - expected
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        predicted.subtract(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn loss_is_mean_over_all_elements() {
        let p = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.5, 0.5]).unwrap();
        let y = Matrix::from_vec(2, 2, vec![0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_relative_eq!(MseLoss::sum_squared(&p, &y).unwrap(), 1.5);
        assert_relative_eq!(MseLoss::loss(&p, &y).unwrap(), 0.375);
    }

    #[test]
    fn loss_rejects_shape_mismatch() {
        let p = Matrix::zeros(2, 1);
        let y = Matrix::zeros(1, 2);
        assert!(MseLoss::loss(&p, &y).is_err());
    }
}
