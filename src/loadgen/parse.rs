use crate::error::BenchError;

/// Prefix of the throughput line in a wrk report, e.g. `Requests/sec:  21453.21`.
pub const THROUGHPUT_MARKER: &str = "Requests/sec:";

/// Extracts the requests/sec figure from a load generator report.
///
/// The first line carrying the marker wins. A missing line or a value that is
/// not a finite, non-negative number is an error; there is no fallback value.
///
/// # Errors
///
/// Returns [`BenchError::MissingThroughput`] or [`BenchError::InvalidThroughput`].
pub fn parse_requests_per_sec(output: &str) -> Result<f64, BenchError> {
    let rest = output
        .lines()
        .find_map(|line| {
            line.split_once(THROUGHPUT_MARKER)
                .map(|(_, rest)| rest)
        })
        .ok_or(BenchError::MissingThroughput)?;

    let token = rest.split_whitespace().next().unwrap_or_default();
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && !value.is_sign_negative())
        .ok_or_else(|| BenchError::InvalidThroughput {
            value: token.to_owned(),
        })
}
