use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{BenchArgs, PositiveU32};
use crate::error::ConfigError;

use super::{ensure_whole_seconds, parse_addr};
use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Only options that were not given on the command line are taken from the
/// config file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "addr")
        && let Some(addr) = config.addr.as_deref()
    {
        args.addr = parse_addr(addr).map_err(|err| invalid("addr", &err))?;
    }

    if !is_cli(matches, "warmup")
        && let Some(warmup) = config.warmup.as_ref()
    {
        args.warmup = warmup
            .to_duration()
            .map_err(|err| invalid("warmup", &err))?;
    }

    if !is_cli(matches, "load_duration")
        && let Some(duration) = config.duration.as_ref()
    {
        let duration = ensure_positive_duration(duration, "duration")?;
        args.load_duration =
            ensure_whole_seconds(duration).map_err(|err| invalid("duration", &err))?;
    }

    if !is_cli(matches, "readiness")
        && let Some(readiness) = config.readiness
    {
        args.readiness = readiness;
    }

    if !is_cli(matches, "probe_attempts")
        && let Some(attempts) = config.probe_attempts
    {
        args.probe_attempts =
            PositiveU32::try_from(attempts).map_err(|err| invalid("probe_attempts", &err))?;
    }

    if !is_cli(matches, "probe_backoff")
        && let Some(backoff) = config.probe_backoff.as_ref()
    {
        args.probe_backoff = ensure_positive_duration(backoff, "probe_backoff")?;
    }

    if !is_cli(matches, "probe_max_backoff")
        && let Some(backoff) = config.probe_max_backoff.as_ref()
    {
        args.probe_max_backoff = ensure_positive_duration(backoff, "probe_max_backoff")?;
    }

    if !is_cli(matches, "wrk")
        && let Some(wrk) = config.wrk.as_deref()
    {
        args.wrk = Some(PathBuf::from(wrk));
    }

    if !is_cli(matches, "root")
        && let Some(root) = config.root.as_deref()
    {
        args.root = Some(PathBuf::from(root));
    }

    if !is_cli(matches, "hyper_hello")
        && let Some(hyper_hello) = config.hyper_hello.as_deref()
    {
        args.hyper_hello = Some(PathBuf::from(hyper_hello));
    }

    if !is_cli(matches, "only")
        && let Some(only) = config.only.as_ref()
    {
        args.only.clone_from(only);
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.as_deref()
    {
        args.output = Some(PathBuf::from(output));
    }

    if !is_cli(matches, "quiet")
        && let Some(quiet) = config.quiet
    {
        args.quiet = quiet;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_duration(
    value: &DurationValue,
    field: &'static str,
) -> Result<std::time::Duration, ConfigError> {
    let duration = value.to_duration().map_err(|err| invalid(field, &err))?;
    if duration.is_zero() {
        return Err(ConfigError::InvalidField {
            field,
            message: "must be > 0".to_owned(),
        });
    }
    Ok(duration)
}

fn invalid(field: &'static str, err: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidField {
        field,
        message: err.to_string(),
    }
}
