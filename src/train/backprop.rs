use crate::activation::sigmoid::Sigmoid;
use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::batch::Batch;

/// Per-layer `(weights_grad, biases_grad)` in layer order, summed over a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub layers: Vec<(Matrix, Matrix)>,
}

/// Runs a forward pass over the batch and backpropagates the squared error.
///
/// Returns the gradients together with the batch's summed squared error,
/// measured before any update.
pub fn compute_gradients(network: &Network, inputs: &Matrix, targets: &Matrix) -> Result<(Gradients, f64)> {
    if inputs.rows() != targets.rows() {
        return Err(Error::mismatch("batch", inputs.dims(), targets.dims()));
    }

    let pass = network.forward(inputs)?;
    let output = pass.output();

    let error = MseLoss::derivative(output, targets)?;
    let batch_loss = error.as_slice().iter().map(|e| e * e).sum();

    // δ_L = (a_L − y) ⊙ σ'(a_L)
    let mut delta = error.elementwise_multiply(&Sigmoid::derivative(output))?;

    let n_layers = network.layers.len();
    let mut grads: Vec<Option<(Matrix, Matrix)>> = vec![None; n_layers];

    for i in (0..n_layers).rev() {
        let layer = &network.layers[i];
        let layer_input = &pass.activations[i];

        grads[i] = Some(layer.compute_gradients(&delta, layer_input)?);

        if i > 0 {
            delta = layer.backpropagate(&delta, layer_input)?;
        }
    }

    let layers = grads.into_iter().flatten().collect();
    Ok((Gradients { layers }, batch_loss))
}

/// One gradient step: backprop over the whole batch, then a single update of
/// every layer. Returns the batch's summed squared error before the update.
pub fn train_batch(network: &mut Network, batch: &Batch, optimizer: &Sgd) -> Result<f64> {
    let (gradients, batch_loss) = compute_gradients(network, &batch.inputs, &batch.targets)?;
    optimizer.step(network, &gradients, batch.len())?;
    Ok(batch_loss)
}
