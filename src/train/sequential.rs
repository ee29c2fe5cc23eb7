use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::backprop::train_batch;
use crate::train::batch::{batch_ranges, Batch};

/// Runs one epoch over `order`, one batch at a time in permutation order.
/// Returns the summed squared error of all batches.
pub(crate) fn run_epoch(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    order: &[usize],
    batch_size: usize,
    optimizer: &Sgd,
) -> Result<f64> {
    let mut total_loss = 0.0;
    for range in batch_ranges(order.len(), batch_size) {
        let batch = Batch::gather(inputs, targets, &order[range])?;
        total_loss += train_batch(network, &batch, optimizer)?;
    }
    Ok(total_loss)
}
