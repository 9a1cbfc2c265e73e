use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::info;

use crate::aggregate::run_all;
use crate::args::BenchArgs;
use crate::config::{BenchConfig, ProbePolicy};
use crate::error::{AppError, AppResult, ValidationError};
use crate::loadgen::{Wrk, default_wrk_path};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::target::{Target, default_hyper_exe};

/// Everything needed to run a batch, resolved from args and config.
#[derive(Debug)]
pub struct BenchPlan {
    pub targets: Vec<Target>,
    pub config: BenchConfig,
    pub wrk: PathBuf,
    pub output: Option<PathBuf>,
}

/// CLI entry point.
///
/// # Errors
///
/// Returns a usage error for bad arguments, a config error for an unreadable
/// config file, and [`ValidationError::TargetsFailed`] when any target failed
/// to produce a measurement.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args(std::env::args_os())? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    // Targets run strictly one after another; one thread is plenty.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args<I>(raw_args: I) -> AppResult<Option<(BenchArgs, ArgMatches)>>
where
    I: IntoIterator<Item = OsString>,
{
    let mut cmd = BenchArgs::command();
    let matches = match cmd.try_get_matches_from_mut(raw_args) {
        Ok(matches) => matches,
        Err(err) => {
            err.print()?;
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                return Ok(None);
            }
            return Err(AppError::validation(ValidationError::Usage {
                message: format!("invalid arguments ({:?})", err.kind()),
            }));
        }
    };
    let args = BenchArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

async fn run_async(mut args: BenchArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }
    let plan = build_plan(&args)?;

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    info!(
        "Benchmarking {} target(s) at {} for {:?} each",
        plan.targets.len(),
        plan.config.address,
        plan.config.load_duration
    );
    let wrk = Wrk::new(&plan.wrk);
    let report = run_all(&plan.targets, &plan.config, &wrk, &mut shutdown_rx).await;
    signal_handle.abort();

    report.print_summary();
    if let Some(path) = plan.output.as_deref() {
        report.write_json(path)?;
        info!("Results written to {}", path.display());
    }

    let failed = report.failed_count();
    if failed > 0 {
        return Err(AppError::validation(ValidationError::TargetsFailed {
            failed,
            total: report.len(),
        }));
    }
    Ok(())
}

/// Resolves paths and builds the runner config from merged arguments.
///
/// # Errors
///
/// Returns an error when the working directory cannot be determined or the
/// target filter selects nothing.
pub fn build_plan(args: &BenchArgs) -> AppResult<BenchPlan> {
    let cwd = std::env::current_dir()?;
    let root = args.root.as_deref().map(|root| absolutize(&cwd, root));

    let deno_exe = resolve_program(&cwd, &args.deno_exe);
    let hyper_exe = args.hyper_hello.as_deref().map_or_else(
        || default_hyper_exe(&deno_exe),
        |path| resolve_program(&cwd, path),
    );

    let targets: Vec<Target> = Target::all(&deno_exe, &hyper_exe)
        .into_iter()
        .filter(|target| args.only.is_empty() || args.only.contains(&target.kind()))
        .collect();
    if targets.is_empty() {
        return Err(AppError::validation(ValidationError::NoTargets));
    }

    let wrk = args.wrk.as_deref().map_or_else(
        || default_wrk_path(root.as_deref().unwrap_or(&cwd)),
        |path| resolve_program(&cwd, path),
    );

    let config = BenchConfig {
        address: args.addr,
        warmup: args.warmup,
        load_duration: args.load_duration,
        readiness: args.readiness,
        probe: ProbePolicy {
            max_attempts: args.probe_attempts.get(),
            initial_backoff: args.probe_backoff,
            max_backoff: args.probe_max_backoff.max(args.probe_backoff),
        },
        working_dir: root,
        echo_output: !args.quiet,
    };

    Ok(BenchPlan {
        targets,
        config,
        wrk,
        output: args.output.clone(),
    })
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Relative paths with a directory part are anchored to the harness's cwd,
/// since servers may run from `--root`. Bare names are left for `PATH` lookup.
fn resolve_program(cwd: &Path, program: &Path) -> PathBuf {
    if program.components().count() > 1 {
        absolutize(cwd, program)
    } else {
        program.to_path_buf()
    }
}
