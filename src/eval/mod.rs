pub mod evaluate;

pub use evaluate::{accuracy, mean_squared_error, regression_errors, RegressionReport};
