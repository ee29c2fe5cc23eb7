pub mod backprop;
pub mod batch;
mod concurrent;
pub mod epoch_stats;
pub mod loop_fn;
mod sequential;
pub mod train_config;

pub use backprop::{compute_gradients, train_batch, Gradients};
pub use batch::Batch;
pub use epoch_stats::EpochStats;
pub use loop_fn::train_loop;
pub use train_config::{Strategy, TrainConfig};
