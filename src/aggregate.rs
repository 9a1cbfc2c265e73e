//! Runs every selected target in turn and collects the report.
use tracing::{info, warn};

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::loadgen::LoadGenerator;
use crate::report::{BenchReport, TargetOutcome};
use crate::runner;
use crate::shutdown::ShutdownReceiver;
use crate::target::Target;

/// Benchmarks `targets` one after another, in order.
///
/// All targets share one address, so a target is only started after the
/// previous server has been torn down. A failing target is recorded and the
/// batch moves on. After a shutdown signal the running target is stopped and
/// the remaining ones are recorded as cancelled.
pub async fn run_all(
    targets: &[Target],
    config: &BenchConfig,
    load_generator: &dyn LoadGenerator,
    shutdown_rx: &mut ShutdownReceiver,
) -> BenchReport {
    let mut report = BenchReport::new();
    let mut cancelled = false;

    for target in targets {
        let label = target.label();
        if cancelled {
            report.record(label, TargetOutcome::Failed(BenchError::Cancelled.to_string()));
            continue;
        }

        info!("Benchmarking {}", label);
        let command = target.command(config.address);
        let result = tokio::select! {
            biased;
            Ok(()) = shutdown_rx.recv() => {
                cancelled = true;
                Err(BenchError::Cancelled)
            }
            result = runner::run(&command, config, load_generator) => result,
        };

        match result {
            Ok(measurement) => {
                info!("{}: {:.2} requests/sec", label, measurement.requests_per_sec);
                report.record(label, TargetOutcome::Completed(measurement.requests_per_sec));
            }
            Err(err) => {
                warn!("{} benchmark failed: {}", label, err);
                report.record(label, TargetOutcome::Failed(err.to_string()));
            }
        }
    }

    report
}
