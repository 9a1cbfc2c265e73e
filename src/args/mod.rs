//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;


pub use cli::BenchArgs;
pub use types::PositiveU32;
