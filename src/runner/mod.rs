//! Benchmarks a single server: spawn, wait for readiness, drive load, parse,
//! terminate.
mod process;
mod readiness;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

use tracing::{debug, info};

use crate::config::{BenchConfig, ReadinessMode};
use crate::error::BenchError;
use crate::loadgen::{LoadGenerator, parse_requests_per_sec};
use crate::target::LaunchCommand;

pub use process::ServerProcess;
pub use readiness::{ensure_address_free, wait_until_ready};

/// Result of one successful benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub requests_per_sec: f64,
    /// Raw load generator report the figure was read from.
    pub output: String,
}

/// Benchmarks the server started by `command`.
///
/// The server process is terminated and reaped before this returns, whatever
/// the outcome. If the returned future is dropped early the process is killed
/// on drop.
///
/// # Errors
///
/// Returns an error when the address is already taken, when the server cannot
/// be spawned, never becomes ready or dies before the load run is over, when
/// the load generator fails, or when its report has no usable requests/sec
/// figure.
pub async fn run(
    command: &LaunchCommand,
    config: &BenchConfig,
    load_generator: &dyn LoadGenerator,
) -> Result<Measurement, BenchError> {
    ensure_address_free(config.address).await?;
    info!("Starting server: {}", command);
    let mut server = ServerProcess::spawn(command, config.working_dir.as_deref())?;
    let result = measure(&mut server, config, load_generator).await;
    server.terminate().await;
    result
}

async fn measure(
    server: &mut ServerProcess,
    config: &BenchConfig,
    load_generator: &dyn LoadGenerator,
) -> Result<Measurement, BenchError> {
    match config.readiness {
        ReadinessMode::Sleep => {
            debug!("Waiting {:?} for the server to start", config.warmup);
            tokio::time::sleep(config.warmup).await;
        }
        ReadinessMode::Probe => {
            wait_until_ready(config.address, &config.probe, || server.exit_status()).await?;
        }
    }
    ensure_running(server)?;

    let url = config.url();
    info!("{}", load_generator.describe(&url, config.load_duration));
    let output = load_generator.generate(&url, config.load_duration).await?;
    // The server must outlive the load run.
    ensure_running(server)?;
    if config.echo_output {
        println!("{}", output);
    } else {
        debug!("Load generator output:\n{}", output);
    }

    let requests_per_sec = parse_requests_per_sec(&output)?;
    Ok(Measurement {
        requests_per_sec,
        output,
    })
}

fn ensure_running(server: &mut ServerProcess) -> Result<(), BenchError> {
    match server.exit_status()? {
        Some(status) => Err(BenchError::TargetExited { status }),
        None => Ok(()),
    }
}
