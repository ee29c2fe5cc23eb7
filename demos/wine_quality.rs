//! Wine-quality regression with ferrite-mlp.
//!
//! Architecture: 11 → 32 → 16 → 8 → 1 (Sigmoid throughout)
//! Loss:         squared error, quality 1..10 mapped into [0, 1]
//! Optimizer:    SGD, lr = 0.3
//! Batch size:   100
//! Epochs:       100, concurrent strategy
//!
//! Run with:
//!   cargo run --example wine_quality --release
//!
//! Data files must be present at data/train_augmented.csv and data/test.csv
//! (semicolon-separated, header row, quality score in the last column).
use std::time::Instant;

use ferrite_mlp::data::load_delimited;
use ferrite_mlp::{regression_errors, train_loop, Network, RunConfig};

fn main() -> ferrite_mlp::Result<()> {
    let run = RunConfig { seed: Some(2024), ..RunConfig::default() };
    run.validate()?;

    let train_path = run.train_path.clone().unwrap_or_default();
    let test_path = run.test_path.clone().unwrap_or_default();
    let train = load_delimited(&train_path, &run.csv)?;
    let test = load_delimited(&test_path, &run.csv)?;

    let mut rng = run.rng();
    let mut network = Network::new(&run.layer_sizes, &mut rng)?;

    let start = Instant::now();
    train_loop(&mut network, &train.inputs, &train.targets, &run.train_config(), &mut rng)?;
    println!("Concurrent training completed in {:.2?}", start.elapsed());

    let report = regression_errors(&network, &test.inputs, &test.targets)?;
    println!("MAE: {}", report.mae);
    println!("MSE: {}", report.mse);
    Ok(())
}
