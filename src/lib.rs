pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::sigmoid::Sigmoid;
pub use layers::dense::Layer;
pub use network::network::{ForwardPass, Network};
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::{train_loop, EpochStats, Strategy, TrainConfig};
pub use eval::{accuracy, mean_squared_error, regression_errors, RegressionReport};
pub use data::{Dataset, DataError};
pub use config::{Metric, RunConfig};
pub use error::{Error, Result};
