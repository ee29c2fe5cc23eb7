use rand::Rng;

use crate::activation::sigmoid::Sigmoid;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// One fully-connected sigmoid layer.
///
/// `weights` has shape (input_size × size) and `biases` is a 1 × size row
/// vector broadcast over every sample of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Layer {
    /// Draws weights and biases independently from N(0, 1).
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        let weights = Matrix::random_normal(input_size, size, rng);
        let biases = Matrix::random_normal(1, size, rng);
        Layer { weights, biases }
    }

    /// Wraps explicit parameters, checking that the bias matches the weight width.
    pub fn from_parts(weights: Matrix, biases: Matrix) -> Result<Layer> {
        if biases.rows() != 1 || biases.cols() != weights.cols() {
            return Err(Error::mismatch("layer_bias", weights.dims(), biases.dims()));
        }
        Ok(Layer { weights, biases })
    }

    pub fn size(&self) -> usize {
        self.weights.cols()
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    /// Returns `(z, a)` for a batch: `z = input·W + b`, `a = σ(z)`.
    pub fn feed_forward(&self, input: &Matrix) -> Result<(Matrix, Matrix)> {
        let z = input.multiply(&self.weights)?.add_row_broadcast(&self.biases)?;
        let a = Sigmoid::apply(&z);
        Ok((z, a))
    }

    /// Gradients for this layer given its delta and the activations that fed it.
    /// Returns `(weights_grad, biases_grad)`, summed over the batch.
    pub fn compute_gradients(&self, delta: &Matrix, inputs: &Matrix) -> Result<(Matrix, Matrix)> {
        let weights_grad = inputs.transpose().multiply(delta)?;
        let biases_grad = delta.column_sums();
        Ok((weights_grad, biases_grad))
    }

    /// Propagates `delta` back through this layer's weights, producing the
    /// delta of the layer below whose activations are `prev_activations`.
    pub fn backpropagate(&self, delta: &Matrix, prev_activations: &Matrix) -> Result<Matrix> {
        delta
            .multiply(&self.weights.transpose())?
            .elementwise_multiply(&Sigmoid::derivative(prev_activations))
    }

    /// Applies pre-computed gradients scaled by `step`.
    ///
    /// Both results are computed before either field is replaced, so a shape
    /// error leaves the layer untouched.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, step: f64) -> Result<()> {
        let weights = self.weights.subtract(&weights_grad.scale(step))?;
        let biases = self.biases.subtract(&biases_grad.scale(step))?;
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_layer_has_expected_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Layer::new(4, 3, &mut rng);
        assert_eq!(layer.weights.dims(), (3, 4));
        assert_eq!(layer.biases.dims(), (1, 4));
        assert_eq!(layer.size(), 4);
        assert_eq!(layer.input_size(), 3);
    }

    #[test]
    fn from_parts_rejects_mismatched_bias() {
        let err = Layer::from_parts(Matrix::zeros(2, 3), Matrix::zeros(1, 2)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { op: "layer_bias", .. }));
    }

    #[test]
    fn feed_forward_adds_bias_then_squashes() {
        let layer = Layer::from_parts(
            Matrix::from_vec(2, 1, vec![1.0, -1.0]).unwrap(),
            Matrix::from_vec(1, 1, vec![0.5]).unwrap(),
        )
        .unwrap();
        let input = Matrix::from_vec(2, 2, vec![1.0, 1.0, 2.0, 0.0]).unwrap();
        let (z, a) = layer.feed_forward(&input).unwrap();
        assert_eq!(z.as_slice(), &[0.5, 2.5]);
        assert_relative_eq!(a.as_slice()[0], Sigmoid::function(0.5));
        assert_relative_eq!(a.as_slice()[1], Sigmoid::function(2.5));
    }

    #[test]
    fn apply_gradients_is_all_or_nothing() {
        let mut layer = Layer::from_parts(Matrix::zeros(2, 2), Matrix::zeros(1, 2)).unwrap();
        let before = layer.clone();
        let bad_bias = Matrix::zeros(1, 3);
        assert!(layer.apply_gradients(&Matrix::zeros(2, 2), &bad_bias, 0.1).is_err());
        assert_eq!(layer, before);
    }
}
