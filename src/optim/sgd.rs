use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::backprop::Gradients;

/// Plain mini-batch gradient descent with a batch-averaged step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies `θ ← θ − (η / batch_len) · ∇θ` to every layer.
    ///
    /// New parameters for all layers are computed first and only then swapped
    /// in, so a shape error leaves the network exactly as it was.
    pub fn step(&self, network: &mut Network, gradients: &Gradients, batch_len: usize) -> Result<()> {
        if gradients.layers.len() != network.layers.len() {
            return Err(Error::mismatch(
                "sgd_step",
                (network.layers.len(), 0),
                (gradients.layers.len(), 0),
            ));
        }
        if batch_len == 0 {
            return Err(Error::InvalidConfig("cannot average gradients over an empty batch".into()));
        }
        let step = self.learning_rate / batch_len as f64;

        let mut updated = Vec::with_capacity(network.layers.len());
        for (layer, (w_grad, b_grad)) in network.layers.iter().zip(&gradients.layers) {
            let mut next = layer.clone();
            next.apply_gradients(w_grad, b_grad, step)?;
            updated.push(next);
        }
        network.layers = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::dense::Layer;
    use crate::math::matrix::Matrix;
    use approx::assert_relative_eq;

    fn single_layer_net() -> Network {
        let layer = Layer::from_parts(
            Matrix::from_vec(2, 1, vec![1.0, 1.0]).unwrap(),
            Matrix::from_vec(1, 1, vec![0.0]).unwrap(),
        )
        .unwrap();
        Network::from_layers(vec![layer]).unwrap()
    }

    #[test]
    fn step_scales_by_learning_rate_over_batch_len() {
        let mut net = single_layer_net();
        let grads = Gradients {
            layers: vec![(
                Matrix::from_vec(2, 1, vec![4.0, -4.0]).unwrap(),
                Matrix::from_vec(1, 1, vec![2.0]).unwrap(),
            )],
        };
        Sgd::new(0.5).step(&mut net, &grads, 4).unwrap();
        let w = net.layers[0].weights.as_slice();
        assert_relative_eq!(w[0], 0.5);
        assert_relative_eq!(w[1], 1.5);
        assert_relative_eq!(net.layers[0].biases.as_slice()[0], -0.25);
    }

    #[test]
    fn step_with_bad_gradient_leaves_network_untouched() {
        let mut net = single_layer_net();
        let before = net.clone();
        let grads = Gradients {
            layers: vec![(Matrix::zeros(3, 1), Matrix::zeros(1, 1))],
        };
        assert!(Sgd::new(0.5).step(&mut net, &grads, 1).is_err());
        assert_eq!(net, before);
    }
}
