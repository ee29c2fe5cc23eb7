use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Feature and target rows for one gradient step.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub inputs: Matrix,
    pub targets: Matrix,
}

impl Batch {
    /// Copies the rows named by `indices` out of the full dataset.
    pub fn gather(inputs: &Matrix, targets: &Matrix, indices: &[usize]) -> Result<Batch> {
        if inputs.rows() != targets.rows() {
            return Err(Error::mismatch("batch", inputs.dims(), targets.dims()));
        }
        Ok(Batch {
            inputs: inputs.gather_rows(indices)?,
            targets: targets.gather_rows(indices)?,
        })
    }

    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fresh uniform permutation of `0..n`.
pub fn shuffled_indices<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Contiguous ranges of `batch_size` over `0..n`; the last one may be shorter.
pub fn batch_ranges(n: usize, batch_size: usize) -> Vec<Range<usize>> {
    (0..n)
        .step_by(batch_size.max(1))
        .map(|start| start..(start + batch_size).min(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ranges_cover_everything_with_short_tail() {
        assert_eq!(batch_ranges(10, 4), vec![0..4, 4..8, 8..10]);
        assert_eq!(batch_ranges(8, 4), vec![0..4, 4..8]);
        assert_eq!(batch_ranges(3, 3), vec![0..3]);
    }

    #[test]
    fn shuffle_is_a_permutation_and_reseeds_reproducibly() {
        let a = shuffled_indices(50, &mut StdRng::seed_from_u64(1));
        let b = shuffled_indices(50, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn consecutive_shuffles_differ() {
        let mut rng = StdRng::seed_from_u64(2);
        let first = shuffled_indices(50, &mut rng);
        let second = shuffled_indices(50, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn gather_keeps_inputs_and_targets_aligned() {
        let x = Matrix::from_vec(3, 2, vec![0.0, 0.1, 1.0, 1.1, 2.0, 2.1]).unwrap();
        let y = Matrix::from_vec(3, 1, vec![10.0, 11.0, 12.0]).unwrap();
        let batch = Batch::gather(&x, &y, &[2, 0]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.inputs.as_slice(), &[2.0, 2.1, 0.0, 0.1]);
        assert_eq!(batch.targets.as_slice(), &[12.0, 10.0]);
    }
}
