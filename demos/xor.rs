use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_mlp::data::builtin;
use ferrite_mlp::{mean_squared_error, train_loop, Network, Strategy, TrainConfig};

fn main() -> ferrite_mlp::Result<()> {
    let data = builtin::xor()?;
    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::new(&[2, 4, 1], &mut rng)?;

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(0.5, 10000, 4, Strategy::Sequential);
    config.progress_tx = Some(tx);

    train_loop(&mut network, &data.inputs, &data.targets, &config, &mut rng)?;
    drop(config);

    for stats in rx.iter().filter(|s| s.epoch % 1000 == 0) {
        println!("Epoch {}: loss = {:.6}", stats.epoch, stats.train_loss);
    }

    let predicted = network.predict(&data.inputs)?;
    for i in 0..data.len() {
        println!("Input: {:?} -> Output: {:.4}", data.inputs.row(i), predicted.row(i)[0]);
    }
    println!("MSE: {:.6}", mean_squared_error(&network, &data.inputs, &data.targets)?);
    Ok(())
}
