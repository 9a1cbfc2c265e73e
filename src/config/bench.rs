use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

/// Every target listens here, one at a time.
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4544);
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(5);
pub const DEFAULT_LOAD_DURATION: Duration = Duration::from_secs(10);

const DEFAULT_PROBE_ATTEMPTS: u32 = 50;
const DEFAULT_PROBE_BACKOFF: Duration = Duration::from_millis(50);
const DEFAULT_PROBE_MAX_BACKOFF: Duration = Duration::from_secs(1);

/// How the runner decides a freshly spawned server is ready for load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessMode {
    /// Connect to the address with exponential backoff until it accepts.
    Probe,
    /// Sleep for the warm-up interval and hope the server is listening.
    ///
    /// A slow server yields a failed or degraded measurement, not an error.
    Sleep,
}

/// Bounded retry schedule for the readiness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_PROBE_ATTEMPTS,
            initial_backoff: DEFAULT_PROBE_BACKOFF,
            max_backoff: DEFAULT_PROBE_MAX_BACKOFF,
        }
    }
}

/// Settings shared by every target in a batch.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub address: SocketAddr,
    /// Fixed delay used by [`ReadinessMode::Sleep`].
    pub warmup: Duration,
    pub load_duration: Duration,
    pub readiness: ReadinessMode,
    pub probe: ProbePolicy,
    /// Working directory for server processes; script paths resolve here.
    pub working_dir: Option<PathBuf>,
    /// Print the raw load generator report for each target.
    pub echo_output: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDR,
            warmup: DEFAULT_WARMUP,
            load_duration: DEFAULT_LOAD_DURATION,
            readiness: ReadinessMode::Probe,
            probe: ProbePolicy::default(),
            working_dir: None,
            echo_output: true,
        }
    }
}

impl BenchConfig {
    /// URL the load generator is pointed at.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.address)
    }
}
