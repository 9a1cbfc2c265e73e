use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{DEFAULT_ADDR, ReadinessMode};
use crate::target::TargetKind;

use super::parsers::{
    parse_addr_arg, parse_duration_arg, parse_load_duration_arg, parse_positive_duration_arg,
    parse_positive_u32,
};
use super::types::PositiveU32;

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "benchmark",
    version,
    about = "Benchmark deno's HTTP server against node and hyper reference servers with wrk and report requests/sec."
)]
pub struct BenchArgs {
    /// Path to the deno executable under test (e.g. out/release/deno)
    #[arg(value_name = "DENO_EXE")]
    pub deno_exe: PathBuf,

    /// Path to the hyper_hello reference server (defaults to hyper_hello next to DENO_EXE)
    #[arg(long = "hyper-hello", value_name = "PATH")]
    pub hyper_hello: Option<PathBuf>,

    /// Address every server listens on, one at a time
    #[arg(long = "addr", default_value_t = DEFAULT_ADDR, value_parser = parse_addr_arg)]
    pub addr: SocketAddr,

    /// Fixed warm-up before load when --readiness=sleep (supports ms/s/m/h)
    #[arg(long = "warmup", default_value = "5s", value_parser = parse_duration_arg)]
    pub warmup: Duration,

    /// How long wrk drives load against each server, in whole seconds (supports s/m/h)
    #[arg(long = "duration", default_value = "10s", value_parser = parse_load_duration_arg)]
    pub load_duration: Duration,

    /// How to wait for a server to start listening
    #[arg(long = "readiness", value_enum, default_value_t = ReadinessMode::Probe)]
    pub readiness: ReadinessMode,

    /// Connection attempts before a server is declared not ready
    #[arg(long = "probe-attempts", default_value = "50", value_parser = parse_positive_u32)]
    pub probe_attempts: PositiveU32,

    /// First delay between readiness probes; doubles after each miss
    #[arg(long = "probe-backoff", default_value = "50ms", value_parser = parse_positive_duration_arg)]
    pub probe_backoff: Duration,

    /// Upper bound for the delay between readiness probes
    #[arg(long = "probe-max-backoff", default_value = "1s", value_parser = parse_positive_duration_arg)]
    pub probe_max_backoff: Duration,

    /// Path to the wrk binary (defaults to third_party/wrk/<platform>/wrk under --root)
    #[arg(long = "wrk", value_name = "PATH")]
    pub wrk: Option<PathBuf>,

    /// Repository root; servers run from here so their script paths resolve
    #[arg(long = "root", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Only benchmark these targets (repeatable); order stays deno, node, node_tcp, hyper
    #[arg(long = "only", value_enum)]
    pub only: Vec<TargetKind>,

    /// Write the results as JSON to this file
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not echo the raw wrk report of each target
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,

    /// Path to config file (TOML or JSON); defaults to benchmark.toml/benchmark.json
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}
