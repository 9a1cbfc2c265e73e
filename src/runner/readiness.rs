use std::net::SocketAddr;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout};
use tracing::debug;

use crate::config::ProbePolicy;
use crate::error::BenchError;

/// Upper bound for a single connection attempt.
const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Checks that nothing is listening on `addr` yet, so a leftover server
/// cannot be mistaken for the one about to be started.
///
/// # Errors
///
/// Returns [`BenchError::AddressInUse`] when a connection to `addr` succeeds.
pub async fn ensure_address_free(addr: SocketAddr) -> Result<(), BenchError> {
    match timeout(PROBE_CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Err(BenchError::AddressInUse { addr })
        }
        Ok(Err(err)) => {
            debug!("Address {} is free: {}", addr, err);
            Ok(())
        }
        Err(_elapsed) => {
            debug!("Connect to {} timed out, treating it as free", addr);
            Ok(())
        }
    }
}

/// Waits until something accepts TCP connections on `addr`.
///
/// Probes immediately, then backs off exponentially from
/// `policy.initial_backoff` up to `policy.max_backoff`. `exited` is polled
/// after every miss so a crashed server fails fast. Returns the number of
/// attempts it took.
///
/// # Errors
///
/// Returns [`BenchError::TargetExited`] when `exited` reports an exit status,
/// and [`BenchError::ReadinessTimeout`] after `policy.max_attempts` misses.
pub async fn wait_until_ready<F>(
    addr: SocketAddr,
    policy: &ProbePolicy,
    mut exited: F,
) -> Result<u32, BenchError>
where
    F: FnMut() -> Result<Option<ExitStatus>, BenchError>,
{
    let started = Instant::now();
    let mut backoff = policy.initial_backoff;
    let mut attempt: u32 = 0;

    loop {
        attempt = attempt.saturating_add(1);
        match timeout(PROBE_CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                debug!(attempt, "Server at {} accepting connections", addr);
                return Ok(attempt);
            }
            Ok(Err(err)) => debug!(attempt, "Probe of {} failed: {}", addr, err),
            Err(_elapsed) => debug!(attempt, "Probe of {} timed out", addr),
        }

        if let Some(status) = exited()? {
            return Err(BenchError::TargetExited { status });
        }
        if attempt >= policy.max_attempts {
            return Err(BenchError::ReadinessTimeout {
                addr,
                attempts: attempt,
                waited: started.elapsed(),
            });
        }

        sleep(backoff).await;
        backoff = backoff.saturating_mul(2).min(policy.max_backoff);
    }
}
