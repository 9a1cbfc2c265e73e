//! External load generator seam and the `wrk` implementation.
mod parse;
mod wrk;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::BenchError;

pub use parse::{THROUGHPUT_MARKER, parse_requests_per_sec};
pub use wrk::{Wrk, default_wrk_path, wrk_platform};

/// Runs load against a URL for a fixed duration and hands back the tool's
/// textual report.
#[async_trait]
pub trait LoadGenerator: Send + Sync {
    /// Human readable command line, used for logging.
    fn describe(&self, url: &str, duration: Duration) -> String;

    /// Blocks until the run finishes and returns the captured stdout and
    /// stderr.
    ///
    /// # Errors
    ///
    /// Returns an error when the tool cannot be started or exits unsuccessfully.
    async fn generate(&self, url: &str, duration: Duration) -> Result<String, BenchError>;
}
