//! Small in-memory datasets for demos and tests.

use crate::data::Dataset;
use crate::error::Result;
use crate::math::matrix::Matrix;

/// The XOR truth table: 4 samples, 2 inputs, 1 target column.
pub fn xor() -> Result<Dataset> {
    Ok(Dataset {
        inputs: Matrix::from_vec(4, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0])?,
        targets: Matrix::from_vec(4, 1, vec![0.0, 1.0, 1.0, 0.0])?,
    })
}

/// Generates `n` samples of 2D "two blobs" data with one-hot targets of length 2.
pub fn blobs(n: usize) -> Result<Dataset> {
    let mut inputs = Vec::with_capacity(n * 2);
    let mut targets = Vec::with_capacity(n * 2);
    // Centers: class 0 at (0.3, 0.3), class 1 at (0.7, 0.7).
    let centers = [(0.3f64, 0.3f64), (0.7f64, 0.7f64)];
    for i in 0..n {
        let class = i % 2;
        let (cx, cy) = centers[class];
        // Deterministic spread using sin/cos of the index.
        let angle = i as f64 * 2.399;
        let r = 0.12 * (i as f64 * 0.31).sin().abs();
        inputs.push((cx + r * angle.cos()).clamp(0.0, 1.0));
        inputs.push((cy + r * angle.sin()).clamp(0.0, 1.0));
        let mut one_hot = [0.0, 0.0];
        one_hot[class] = 1.0;
        targets.extend_from_slice(&one_hot);
    }
    Ok(Dataset {
        inputs: Matrix::from_vec(n, 2, inputs)?,
        targets: Matrix::from_vec(n, 2, targets)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_has_four_rows() {
        let data = xor().unwrap();
        assert_eq!(data.inputs.dims(), (4, 2));
        assert_eq!(data.targets.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn blobs_alternate_classes_and_stay_in_unit_square() {
        let data = blobs(20).unwrap();
        assert_eq!(data.len(), 20);
        assert_eq!(data.target_count(), 2);
        assert_eq!(data.targets.row(0), &[1.0, 0.0]);
        assert_eq!(data.targets.row(1), &[0.0, 1.0]);
        assert!(data.inputs.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
