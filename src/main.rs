//! ferrite-mlp CLI: train a sigmoid MLP on delimited data and report test metrics.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use ferrite_mlp::data::{builtin, load_delimited};
use ferrite_mlp::{
    accuracy, mean_squared_error, regression_errors, train_loop, EpochStats, Metric, Network,
    Result, RunConfig, Strategy, TrainConfig,
};

#[derive(Parser)]
#[command(name = "ferrite-mlp")]
#[command(about = "Train a from-scratch multilayer perceptron with mini-batch gradient descent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a delimited training file and evaluate on a test file
    Train {
        /// JSON run configuration; flags below override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Training data file
        #[arg(long)]
        train: Option<PathBuf>,

        /// Test data file
        #[arg(long)]
        test: Option<PathBuf>,

        /// Layer widths, input first (e.g. 11,32,16,8,1)
        #[arg(long, value_delimiter = ',')]
        layers: Option<Vec<usize>>,

        #[arg(short, long)]
        epochs: Option<usize>,

        #[arg(short, long)]
        batch_size: Option<usize>,

        #[arg(short, long)]
        learning_rate: Option<f64>,

        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,

        /// How to score the test split
        #[arg(short, long, value_enum)]
        metric: Option<MetricArg>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads for the concurrent strategy
        #[arg(short, long)]
        workers: Option<usize>,

        /// Print per-epoch statistics as JSON lines
        #[arg(long)]
        progress: bool,
    },

    /// Train a 2-4-1 network on the XOR truth table
    Xor {
        #[arg(short, long, default_value = "5000")]
        epochs: usize,

        #[arg(short, long, default_value = "0.5")]
        learning_rate: f64,

        #[arg(short, long, value_enum, default_value = "sequential")]
        strategy: StrategyArg,

        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Sequential,
    Concurrent,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sequential => Strategy::Sequential,
            StrategyArg::Concurrent => Strategy::Concurrent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Accuracy,
    Regression,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Accuracy => Metric::Accuracy,
            MetricArg::Regression => Metric::Regression,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            config,
            train,
            test,
            layers,
            epochs,
            batch_size,
            learning_rate,
            strategy,
            metric,
            seed,
            workers,
            progress,
        } => {
            let base = match config {
                Some(path) => RunConfig::load_json(path),
                None => Ok(RunConfig::default()),
            };
            base.and_then(|mut run| {
                run.train_path = train.or(run.train_path);
                run.test_path = test.or(run.test_path);
                run.layer_sizes = layers.unwrap_or(run.layer_sizes);
                run.epochs = epochs.unwrap_or(run.epochs);
                run.batch_size = batch_size.unwrap_or(run.batch_size);
                run.learning_rate = learning_rate.unwrap_or(run.learning_rate);
                run.strategy = strategy.map_or(run.strategy, Strategy::from);
                run.metric = metric.map_or(run.metric, Metric::from);
                run.seed = seed.or(run.seed);
                run.workers = workers.or(run.workers);
                cmd_train(&run, progress)
            })
        }
        Commands::Xor {
            epochs,
            learning_rate,
            strategy,
            seed,
        } => cmd_xor(epochs, learning_rate, strategy.into(), seed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_train(run: &RunConfig, progress: bool) -> Result<()> {
    run.validate()?;

    let train_path = run.train_path.as_ref().ok_or_else(|| {
        ferrite_mlp::Error::InvalidConfig("no training file given (--train or train_path)".into())
    })?;
    let train_set = load_delimited(train_path, &run.csv)?;
    let test_set = match &run.test_path {
        Some(path) => Some(load_delimited(path, &run.csv)?),
        None => None,
    };

    println!(
        "Loaded {} training rows ({} features, {} targets)",
        train_set.len(),
        train_set.feature_count(),
        train_set.target_count()
    );

    let mut rng = run.rng();
    let mut network = Network::new(&run.layer_sizes, &mut rng)?;

    let mut config = run.train_config();
    let printer = progress.then(|| attach_progress_printer(&mut config));

    let start = Instant::now();
    let outcome = train_loop(&mut network, &train_set.inputs, &train_set.targets, &config, &mut rng);
    drop(config);
    if let Some(handle) = printer {
        join_progress_printer(handle);
    }
    let last_loss = outcome?;
    println!(
        "{} training completed in {:.2?} (final epoch loss {:.6})",
        capitalize(&run.strategy.to_string()),
        start.elapsed(),
        last_loss
    );

    let Some(test_set) = test_set else {
        return Ok(());
    };
    match run.metric {
        Metric::Regression => {
            let report = regression_errors(&network, &test_set.inputs, &test_set.targets)?;
            println!("MAE: {}", report.mae);
            println!("MSE: {}", report.mse);
        }
        Metric::Accuracy => {
            let acc = accuracy(&network, &test_set.inputs, &test_set.targets)?;
            println!("Accuracy: {:.2}%", acc);
        }
    }
    Ok(())
}

fn cmd_xor(epochs: usize, learning_rate: f64, strategy: Strategy, seed: u64) -> Result<()> {
    let data = builtin::xor()?;
    let run = RunConfig {
        layer_sizes: vec![2, 4, 1],
        learning_rate,
        batch_size: data.len(),
        epochs,
        strategy,
        seed: Some(seed),
        ..RunConfig::default()
    };
    run.validate()?;

    let mut rng = run.rng();
    let mut network = Network::new(&run.layer_sizes, &mut rng)?;
    train_loop(&mut network, &data.inputs, &data.targets, &run.train_config(), &mut rng)?;

    let predicted = network.predict(&data.inputs)?;
    for i in 0..data.len() {
        println!("Input: {:?} -> Output: {:.4}", data.inputs.row(i), predicted.row(i)[0]);
    }
    println!("MSE: {:.6}", mean_squared_error(&network, &data.inputs, &data.targets)?);
    Ok(())
}

/// Wires a channel into `config` and prints each `EpochStats` as one JSON line.
fn attach_progress_printer(config: &mut TrainConfig) -> thread::JoinHandle<()> {
    let (tx, rx) = mpsc::channel::<EpochStats>();
    config.progress_tx = Some(tx);
    thread::spawn(move || {
        for stats in rx {
            match serde_json::to_string(&stats) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("cannot encode epoch stats: {e}"),
            }
        }
    })
}

/// Waits for the printer thread, reporting on stderr if it panicked.
/// Returns `true` when the thread finished cleanly.
fn join_progress_printer(handle: thread::JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            eprintln!("warning: progress printer panicked; some epoch stats were not printed");
            false
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
