use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::batch::shuffled_indices;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::{Strategy, TrainConfig};
use crate::train::{concurrent, sequential};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the mean training
/// loss of the **last completed epoch** (`0.0` if no epoch ran).
///
/// # Arguments
/// - `network` — mutable reference to the network; modified in place
/// - `inputs`  — training features, one sample per row
/// - `targets` — training targets, one row per sample
/// - `config`  — hyperparameters, strategy, optional progress channel, optional stop flag
/// - `rng`     — source for the per-epoch shuffle
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidConfig` for unusable hyperparameters or an empty dataset,
/// `DimensionMismatch` when the data does not fit the network.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64> {
    validate(network, inputs, targets, config)?;

    let optimizer = Sgd::new(config.learning_rate);
    let pool = match config.strategy {
        Strategy::Concurrent => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers.unwrap_or(0))
                .build()
                .map_err(|e| Error::InvalidConfig(format!("cannot start worker pool: {}", e)))?,
        ),
        Strategy::Sequential => None,
    };

    let n = inputs.rows();
    let elements = (n * targets.cols()) as f64;
    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let order = shuffled_indices(n, rng);
        let total_loss = match &pool {
            Some(pool) => concurrent::run_epoch(
                pool,
                network,
                inputs,
                targets,
                &order,
                config.batch_size,
                &optimizer,
            )?,
            None => sequential::run_epoch(
                network,
                inputs,
                targets,
                &order,
                config.batch_size,
                &optimizer,
            )?,
        };
        let train_loss = total_loss / elements;
        last_train_loss = train_loss;

        // ── Emit progress ─────────────────────────────────────────────────
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
            strategy: config.strategy,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_train_loss)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}

fn validate(network: &Network, inputs: &Matrix, targets: &Matrix, config: &TrainConfig) -> Result<()> {
    if network.layers.is_empty() {
        return Err(Error::InvalidConfig("network has no layers to train".into()));
    }
    if inputs.rows() == 0 {
        return Err(Error::InvalidConfig("training set must not be empty".into()));
    }
    if inputs.rows() != targets.rows() {
        return Err(Error::mismatch("train_loop", inputs.dims(), targets.dims()));
    }
    if inputs.cols() != network.input_size() {
        return Err(Error::mismatch(
            "network_input",
            inputs.dims(),
            (inputs.rows(), network.input_size()),
        ));
    }
    if targets.cols() != network.output_size() {
        return Err(Error::mismatch(
            "network_output",
            targets.dims(),
            (targets.rows(), network.output_size()),
        ));
    }
    if config.batch_size == 0 || config.batch_size > inputs.rows() {
        return Err(Error::InvalidConfig(format!(
            "batch_size must be between 1 and {}, got {}",
            inputs.rows(),
            config.batch_size
        )));
    }
    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "learning_rate must be a positive number, got {}",
            config.learning_rate
        )));
    }
    if config.workers == Some(0) {
        return Err(Error::InvalidConfig("workers must be at least 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset() -> (Matrix, Matrix) {
        let x = Matrix::from_vec(4, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        let y = Matrix::from_vec(4, 1, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        (x, y)
    }

    #[test]
    fn rejects_out_of_range_batch_size() {
        let (x, y) = dataset();
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new(&[2, 3, 1], &mut rng).unwrap();
        for batch_size in [0, 5] {
            let config = TrainConfig::new(0.5, 1, batch_size, Strategy::Sequential);
            let err = train_loop(&mut net, &x, &y, &config, &mut rng).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)));
        }
    }

    #[test]
    fn rejects_non_positive_learning_rate() {
        let (x, y) = dataset();
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new(&[2, 3, 1], &mut rng).unwrap();
        for lr in [0.0, -1.0, f64::NAN] {
            let config = TrainConfig::new(lr, 1, 2, Strategy::Sequential);
            assert!(train_loop(&mut net, &x, &y, &config, &mut rng).is_err());
        }
    }

    #[test]
    fn rejects_data_that_does_not_fit_network() {
        let (x, y) = dataset();
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new(&[3, 2, 1], &mut rng).unwrap();
        let config = TrainConfig::new(0.5, 1, 2, Strategy::Sequential);
        let err = train_loop(&mut net, &x, &y, &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { op: "network_input", .. }));
    }

    #[test]
    fn rejects_network_without_layers() {
        let (x, y) = dataset();
        let mut net = Network { layers: vec![] };
        for strategy in [Strategy::Sequential, Strategy::Concurrent] {
            let config = TrainConfig::new(0.5, 1, 2, strategy);
            let err = train_loop(&mut net, &x, &y, &config, &mut StdRng::seed_from_u64(0)).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)));
        }
    }

    #[test]
    fn sends_one_stat_per_epoch() {
        let (x, y) = dataset();
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new(&[2, 3, 1], &mut rng).unwrap();
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(0.5, 3, 3, Strategy::Sequential);
        config.progress_tx = Some(tx);

        let last = train_loop(&mut net, &x, &y, &config, &mut rng).unwrap();
        drop(config);
        let stats: Vec<EpochStats> = rx.iter().collect();

        assert_eq!(stats.len(), 3);
        assert_eq!(stats.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(stats.iter().all(|s| s.total_epochs == 3 && s.strategy == Strategy::Sequential));
        assert_eq!(stats[2].train_loss, last);
    }

    #[test]
    fn stop_flag_prevents_any_epoch() {
        let (x, y) = dataset();
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new(&[2, 3, 1], &mut rng).unwrap();
        let before = net.clone();
        let mut config = TrainConfig::new(0.5, 10, 2, Strategy::Concurrent);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

        let loss = train_loop(&mut net, &x, &y, &config, &mut rng).unwrap();
        assert_eq!(loss, 0.0);
        assert_eq!(net, before);
    }

    #[test]
    fn dropped_receiver_stops_after_first_epoch() {
        let (x, y) = dataset();
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new(&[2, 3, 1], &mut rng).unwrap();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(0.5, 1000, 4, Strategy::Sequential);
        config.progress_tx = Some(tx);

        let mut reference = net.clone();
        let one_epoch = TrainConfig::new(0.5, 1, 4, Strategy::Sequential);
        train_loop(&mut reference, &x, &y, &one_epoch, &mut StdRng::seed_from_u64(1)).unwrap();

        train_loop(&mut net, &x, &y, &config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(net, reference);
    }
}
