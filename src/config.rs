use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::csv::CsvOptions;
use crate::error::{Error, Result};
use crate::train::train_config::{Strategy, TrainConfig};

/// How the held-out split is scored after training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Percentage of rows whose decoded class matches the target.
    Accuracy,
    /// Mean absolute and mean squared error of the raw outputs.
    #[default]
    Regression,
}

/// Everything needed for one training run, loadable from JSON.
///
/// Missing fields fall back to `RunConfig::default()`: an 11-feature
/// regression network `[11, 32, 16, 8, 1]` trained concurrently with
/// η = 0.3, batches of 100, for 100 epochs, on `;`-separated files whose
/// 1–10 score target is mapped into [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub layer_sizes: Vec<usize>,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub strategy: Strategy,
    /// Seeds initialization and shuffling; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub train_path: Option<PathBuf>,
    pub test_path: Option<PathBuf>,
    pub csv: CsvOptions,
    pub metric: Metric,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            layer_sizes: vec![11, 32, 16, 8, 1],
            learning_rate: 0.3,
            batch_size: 100,
            epochs: 100,
            strategy: Strategy::Concurrent,
            seed: None,
            workers: None,
            train_path: Some(PathBuf::from("data/train_augmented.csv")),
            test_path: Some(PathBuf::from("data/test.csv")),
            csv: CsvOptions {
                target_offset: 1.0,
                target_divisor: 9.0,
                ..CsvOptions::default()
            },
            metric: Metric::Regression,
        }
    }
}

impl RunConfig {
    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::InvalidConfig(format!("cannot open {}: {}", path.display(), e)))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| Error::InvalidConfig(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|e| Error::InvalidConfig(format!("cannot create {}: {}", path.display(), e)))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| Error::InvalidConfig(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Checks everything that can be checked without the data.
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 || self.layer_sizes.contains(&0) {
            return Err(Error::InvalidConfig(format!(
                "layer_sizes needs at least two positive entries, got {:?}",
                self.layer_sizes
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }

    pub fn train_config(&self) -> TrainConfig {
        let mut config = TrainConfig::new(self.learning_rate, self.epochs, self.batch_size, self.strategy);
        config.workers = self.workers;
        config
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
