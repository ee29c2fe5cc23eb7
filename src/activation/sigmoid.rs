use crate::math::matrix::Matrix;

/// Logistic activation used by every layer of the network.
pub struct Sigmoid;

impl Sigmoid {
    /// σ(x) = 1 / (1 + e^(-x))
    pub fn function(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// σ'(z) written in terms of the activation `a = σ(z)`: a·(1 − a).
    ///
    /// Backprop already holds every layer's activation, so this avoids
    /// re-evaluating the exponential.
    pub fn derivative_from_output(a: f64) -> f64 {
        a * (1.0 - a)
    }

    pub fn apply(z: &Matrix) -> Matrix {
        z.map(Sigmoid::function)
    }

    pub fn derivative(activations: &Matrix) -> Matrix {
        activations.map(Sigmoid::derivative_from_output)
    }
}
