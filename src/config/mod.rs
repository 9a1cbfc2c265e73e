//! Benchmark configuration: the explicit `BenchConfig` handed to the runner,
//! plus loading and applying optional TOML/JSON config files.
pub(crate) mod apply;
mod bench;
mod loader;
mod parse;
pub mod types;


pub use apply::apply_config;
pub use bench::{
    BenchConfig, DEFAULT_ADDR, DEFAULT_LOAD_DURATION, DEFAULT_WARMUP, ProbePolicy, ReadinessMode,
};
pub use loader::load_config;

#[cfg(test)]
pub(crate) use loader::load_config_file;
pub(crate) use parse::{
    ensure_whole_seconds, parse_addr, parse_duration_value, parse_load_duration,
    parse_positive_duration,
};
