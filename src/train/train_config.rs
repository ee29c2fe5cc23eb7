use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Deserialize, Serialize};

use crate::train::epoch_stats::EpochStats;

/// How the batches of an epoch are driven through gradient descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One batch after another, in permutation order.
    Sequential,
    /// One task per batch on a worker pool. Gathering runs in parallel; the
    /// forward pass, backprop and update run under a single lock, in
    /// whatever order the tasks acquire it.
    #[default]
    Concurrent,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Concurrent => write!(f, "concurrent"),
        }
    }
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `learning_rate` — step size applied to the batch-averaged gradient
/// - `epochs`        — total number of full passes over the training data
/// - `batch_size`    — samples per mini-batch; the last batch may be shorter
/// - `strategy`      — sequential or concurrent batch processing
/// - `workers`       — thread-pool size for the concurrent strategy
///                     (`None` uses rayon's default)
/// - `progress_tx`   — optional channel sender; one `EpochStats` is sent per
///                     completed epoch.  If the receiver is dropped the loop
///                     terminates early (clean shutdown).
/// - `stop_flag`     — optional atomic flag; when set to `true` from another
///                     thread the loop terminates after the current epoch.
pub struct TrainConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub strategy: Strategy,
    pub workers: Option<usize>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(learning_rate: f64, epochs: usize, batch_size: usize, strategy: Strategy) -> Self {
        TrainConfig {
            learning_rate,
            epochs,
            batch_size,
            strategy,
            workers: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
