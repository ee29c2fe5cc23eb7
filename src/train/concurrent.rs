use std::sync::Mutex;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::backprop::train_batch;
use crate::train::batch::{batch_ranges, Batch};

/// Runs one epoch over `order` with one pool task per batch.
///
/// Each task gathers its own rows from the read-only dataset, then takes the
/// network lock for the forward pass, backprop and update. The lock covers
/// the forward pass as well, so no task computes gradients against
/// parameters another task is replacing. Returns once every task has
/// finished.
pub(crate) fn run_epoch(
    pool: &ThreadPool,
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    order: &[usize],
    batch_size: usize,
    optimizer: &Sgd,
) -> Result<f64> {
    let shared = Mutex::new(network);

    let losses: Result<Vec<f64>> = pool.install(|| {
        batch_ranges(order.len(), batch_size)
            .into_par_iter()
            .map(|range| {
                let batch = Batch::gather(inputs, targets, &order[range])?;
                let mut guard = shared.lock().map_err(|_| Error::WorkerPanicked)?;
                train_batch(&mut **guard, &batch, optimizer)
            })
            .collect()
    });

    Ok(losses?.into_iter().sum())
}
