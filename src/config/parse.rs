use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ValidationError;

/// Parses `500ms`, `5s`, `2m`, `1h` or a bare number of seconds. Zero is allowed.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value
        .chars()
        .take_while(char::is_ascii_digit)
        .map(char::len_utf8)
        .sum::<usize>();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    match unit {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        "h" => number
            .checked_mul(60)
            .and_then(|minutes| minutes.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        _ => Err(ValidationError::InvalidDurationUnit {
            unit: unit.to_owned(),
        }),
    }
}

pub(crate) fn parse_positive_duration(value: &str) -> Result<Duration, ValidationError> {
    let duration = parse_duration_value(value)?;
    if duration.is_zero() {
        return Err(ValidationError::DurationZero);
    }
    Ok(duration)
}

/// Load durations are handed to wrk in whole seconds.
pub(crate) fn parse_load_duration(value: &str) -> Result<Duration, ValidationError> {
    ensure_whole_seconds(parse_positive_duration(value)?)
}

pub(crate) fn ensure_whole_seconds(duration: Duration) -> Result<Duration, ValidationError> {
    if duration.subsec_nanos() != 0 {
        return Err(ValidationError::DurationNotWholeSeconds {
            millis: duration.as_millis(),
        });
    }
    Ok(duration)
}

pub(crate) fn parse_addr(value: &str) -> Result<SocketAddr, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidAddress {
            value: value.to_owned(),
            source: err,
        })
}
