use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub struct MaeLoss;

impl MaeLoss {
    /// Scalar MAE: mean(|predicted - expected|) over all elements.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        let diff = predicted.subtract(expected)?;
        let n = diff.as_slice().len();
        if n == 0 {
            return Err(Error::mismatch("mae", predicted.dims(), expected.dims()));
        }
        Ok(diff.as_slice().iter().map(|d| d.abs()).sum::<f64>() / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn loss_averages_absolute_differences() {
        let p = Matrix::from_vec(3, 1, vec![0.2, 0.9, 0.4]).unwrap();
        let y = Matrix::from_vec(3, 1, vec![0.0, 1.0, 1.0]).unwrap();
        assert_relative_eq!(MaeLoss::loss(&p, &y).unwrap(), 0.3, epsilon = 1e-12);
    }
}
