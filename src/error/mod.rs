mod app;
mod bench;
mod config;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use bench::BenchError;
pub use config::ConfigError;
pub use validation::ValidationError;
