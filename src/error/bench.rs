use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Failures of a single target's benchmark run.
///
/// These never abort a whole batch: the aggregator records them against the
/// target's label and moves on.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Server at {addr} not accepting connections after {attempts} attempts ({waited:?}).")]
    ReadinessTimeout {
        addr: SocketAddr,
        attempts: u32,
        waited: Duration,
    },
    #[error("Address {addr} is already accepting connections before the server started.")]
    AddressInUse { addr: SocketAddr },
    #[error("Server process exited unexpectedly ({status}).")]
    TargetExited { status: ExitStatus },
    #[error("Failed to launch load generator '{program}': {source}")]
    LoadGeneratorLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Load generator exited with {status}: {output}")]
    LoadGeneratorStatus { status: ExitStatus, output: String },
    #[error("No 'Requests/sec:' line in load generator output.")]
    MissingThroughput,
    #[error("Invalid Requests/sec value '{value}'.")]
    InvalidThroughput { value: String },
    #[error("Failed to poll server process: {source}")]
    ProcessStatus {
        #[source]
        source: std::io::Error,
    },
    #[error("Benchmark cancelled.")]
    Cancelled,
}

impl BenchError {
    /// True for the failures that come from reading the load generator's report.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingThroughput | Self::InvalidThroughput { .. }
        )
    }

    /// True when the load generator could not be run or reported failure.
    #[must_use]
    pub const fn is_load_generator_error(&self) -> bool {
        matches!(
            self,
            Self::LoadGeneratorLaunch { .. } | Self::LoadGeneratorStatus { .. }
        )
    }
}
