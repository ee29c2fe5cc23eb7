use rand::Rng;

use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;

/// Every intermediate matrix produced by one forward pass.
///
/// `activations[0]` is the input batch and `activations[L]` the prediction;
/// `pre_activations[l]` is the `z` that produced `activations[l + 1]`.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub activations: Vec<Matrix>,
    pub pre_activations: Vec<Matrix>,
}

impl ForwardPass {
    pub fn output(&self) -> &Matrix {
        // `activations` always holds at least the input.
        &self.activations[self.activations.len() - 1]
    }
}

/// Fully-connected sigmoid network.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from layer widths, input first: `[11, 32, 16, 8, 1]`
    /// gives four layers. All parameters are drawn from N(0, 1) using `rng`.
    pub fn new<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Network> {
        if sizes.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "a network needs at least an input and an output size, got {:?}",
                sizes
            )));
        }
        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::InvalidConfig(format!(
                "layer size at position {} must be positive",
                pos
            )));
        }
        let layers = sizes
            .windows(2)
            .map(|pair| Layer::new(pair[1], pair[0], rng))
            .collect();
        Ok(Network { layers })
    }

    /// Builds a network from explicit layers (input → output).
    pub fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        if layers.is_empty() {
            return Err(Error::InvalidConfig("a network needs at least one layer".into()));
        }
        for pair in layers.windows(2) {
            if pair[0].size() != pair[1].input_size() {
                return Err(Error::mismatch(
                    "layer_chain",
                    pair[0].weights.dims(),
                    pair[1].weights.dims(),
                ));
            }
        }
        Ok(Network { layers })
    }

    /// Input width, or 0 for a network with no layers.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    /// Output width, or 0 for a network with no layers.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    /// Layer widths, input first.
    pub fn sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::size))
            .collect()
    }

    /// Forward pass over a batch (one sample per row), keeping every layer's
    /// activation for backprop.
    pub fn forward(&self, input: &Matrix) -> Result<ForwardPass> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        activations.push(input.clone());

        for layer in &self.layers {
            let (z, a) = layer.feed_forward(&activations[activations.len() - 1])?;
            pre_activations.push(z);
            activations.push(a);
        }

        Ok(ForwardPass { activations, pre_activations })
    }

    /// Output activations only.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.feed_forward(&current)?.1;
        }
        Ok(current)
    }
}
