use std::net::SocketAddr;
use std::time::Duration;

use super::test_support::{FailingGenerator, StaticOutput, no_warmup_config, sleeper};
use super::{run, wait_until_ready};
use crate::config::{BenchConfig, ProbePolicy, ReadinessMode};
use crate::error::BenchError;
use crate::target::LaunchCommand;

fn fast_policy(max_attempts: u32) -> ProbePolicy {
    ProbePolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
    }
}

fn closed_addr() -> Result<SocketAddr, String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind failed: {}", err))?;
    listener
        .local_addr()
        .map_err(|err| format!("local addr failed: {}", err))
}

#[tokio::test]
async fn run_returns_parsed_throughput() -> Result<(), String> {
    let generator = StaticOutput::new("Requests/sec: 1234.56\n");
    let measurement = run(&sleeper(), &no_warmup_config(), &generator)
        .await
        .map_err(|err| err.to_string())?;
    if (measurement.requests_per_sec - 1234.56).abs() > 1e-9 {
        return Err(format!(
            "Unexpected throughput {}",
            measurement.requests_per_sec
        ));
    }
    if measurement.output != "Requests/sec: 1234.56\n" {
        return Err("Raw output not kept".to_owned());
    }
    Ok(())
}

#[tokio::test]
async fn run_rejects_non_numeric_throughput() -> Result<(), String> {
    let generator = StaticOutput::new("Requests/sec: abc\n");
    match run(&sleeper(), &no_warmup_config(), &generator).await {
        Err(err) if err.is_parse_error() => Ok(()),
        other => Err(format!("Expected parse error, got {:?}", other)),
    }
}

#[tokio::test]
async fn run_reports_spawn_failure() -> Result<(), String> {
    let command = LaunchCommand::new("/nonexistent/http-bench-server").arg("4544");
    let generator = StaticOutput::new("Requests/sec: 1\n");
    match run(&command, &no_warmup_config(), &generator).await {
        Err(BenchError::Spawn { program, .. }) => {
            if program != command.program {
                return Err(format!("Unexpected program {}", program.display()));
            }
            Ok(())
        }
        other => Err(format!("Expected spawn error, got {:?}", other)),
    }
}

#[tokio::test]
async fn run_propagates_load_generator_failure() -> Result<(), String> {
    match run(&sleeper(), &no_warmup_config(), &FailingGenerator).await {
        Err(err) if err.is_load_generator_error() => Ok(()),
        other => Err(format!("Expected load generator error, got {:?}", other)),
    }
}

#[tokio::test]
async fn probe_mode_times_out_when_nothing_listens() -> Result<(), String> {
    let config = BenchConfig {
        address: closed_addr()?,
        readiness: ReadinessMode::Probe,
        probe: fast_policy(3),
        echo_output: false,
        ..BenchConfig::default()
    };
    let generator = StaticOutput::new("Requests/sec: 1\n");
    match run(&sleeper(), &config, &generator).await {
        Err(BenchError::ReadinessTimeout { attempts, .. }) => {
            if attempts != 3 {
                return Err(format!("Unexpected attempts {}", attempts));
            }
            Ok(())
        }
        other => Err(format!("Expected readiness timeout, got {:?}", other)),
    }
}

#[tokio::test]
async fn probe_mode_notices_exited_server() -> Result<(), String> {
    let config = BenchConfig {
        address: closed_addr()?,
        readiness: ReadinessMode::Probe,
        probe: ProbePolicy {
            max_attempts: 200,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(10),
        },
        echo_output: false,
        ..BenchConfig::default()
    };
    let generator = StaticOutput::new("Requests/sec: 1\n");
    match run(&LaunchCommand::new("true"), &config, &generator).await {
        Err(BenchError::TargetExited { .. }) => Ok(()),
        other => Err(format!("Expected exited server, got {:?}", other)),
    }
}

#[tokio::test]
async fn run_refuses_address_already_in_use() -> Result<(), String> {
    let stale = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = stale
        .local_addr()
        .map_err(|err| format!("local addr failed: {}", err))?;
    let config = BenchConfig {
        address: addr,
        readiness: ReadinessMode::Probe,
        probe: fast_policy(3),
        echo_output: false,
        ..BenchConfig::default()
    };
    let generator = StaticOutput::new("Requests/sec: 1234.56\n");

    match run(&LaunchCommand::new("false"), &config, &generator).await {
        Err(BenchError::AddressInUse { addr: reported }) if reported == addr => Ok(()),
        other => Err(format!("Expected address in use, got {:?}", other)),
    }
}

#[tokio::test]
async fn run_fails_when_server_dies_during_load() -> Result<(), String> {
    let generator =
        StaticOutput::new("Requests/sec: 1234.56\n").delayed(Duration::from_millis(300));
    match run(&LaunchCommand::new("true"), &no_warmup_config(), &generator).await {
        Err(BenchError::TargetExited { .. }) => Ok(()),
        other => Err(format!("Expected exited server, got {:?}", other)),
    }
}

#[tokio::test]
async fn probe_succeeds_once_listener_accepts() -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local addr failed: {}", err))?;

    let attempts = wait_until_ready(addr, &fast_policy(5), || Ok(None))
        .await
        .map_err(|err| err.to_string())?;
    if attempts != 1 {
        return Err(format!("Expected first probe to succeed, took {}", attempts));
    }
    Ok(())
}

#[tokio::test]
async fn probe_waits_for_late_listener() -> Result<(), String> {
    let addr = closed_addr()?;
    let late = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        let listener = tokio::net::TcpListener::bind(addr).await;
        if let Ok(listener) = listener.as_ref() {
            drop(listener.accept().await);
        }
        listener.is_ok()
    });

    let attempts = wait_until_ready(addr, &fast_policy(100), || Ok(None))
        .await
        .map_err(|err| err.to_string())?;
    if attempts < 2 {
        return Err(format!("Expected retries, took {}", attempts));
    }
    let bound = late.await.map_err(|err| format!("join failed: {}", err))?;
    if !bound {
        return Err("Late listener failed to bind".to_owned());
    }
    Ok(())
}

#[tokio::test]
async fn probe_gives_up_after_max_attempts() -> Result<(), String> {
    let addr = closed_addr()?;
    match wait_until_ready(addr, &fast_policy(4), || Ok(None)).await {
        Err(BenchError::ReadinessTimeout {
            attempts,
            addr: reported,
            ..
        }) => {
            if attempts != 4 || reported != addr {
                return Err(format!("Unexpected timeout details {} {}", attempts, reported));
            }
            Ok(())
        }
        other => Err(format!("Expected timeout, got {:?}", other)),
    }
}

#[cfg(target_os = "linux")]
mod teardown {
    use super::*;
    use crate::runner::test_support::{
        process_alive, read_pid, sleeper_with_pid_file, wait_for_exit,
    };

    const EXIT_WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn server_is_gone_after_success() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let pid_file = dir.path().join("server.pid");
        let generator = StaticOutput::new("Requests/sec: 10\n").after_pid_file(&pid_file);

        run(&sleeper_with_pid_file(&pid_file), &no_warmup_config(), &generator)
            .await
            .map_err(|err| err.to_string())?;

        let pid = read_pid(&pid_file)?;
        if process_alive(pid) {
            return Err(format!("Server {} still running after run returned", pid));
        }
        Ok(())
    }

    #[tokio::test]
    async fn server_is_gone_after_parse_failure() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let pid_file = dir.path().join("server.pid");
        let generator = StaticOutput::new("no throughput here\n").after_pid_file(&pid_file);

        let result = run(&sleeper_with_pid_file(&pid_file), &no_warmup_config(), &generator).await;
        if !matches!(result, Err(BenchError::MissingThroughput)) {
            return Err(format!("Expected missing throughput, got {:?}", result));
        }

        let pid = read_pid(&pid_file)?;
        if process_alive(pid) {
            return Err(format!("Server {} still running after run returned", pid));
        }
        Ok(())
    }

    #[tokio::test]
    async fn server_is_killed_when_run_is_cancelled() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let pid_file = dir.path().join("server.pid");
        let generator = StaticOutput::new("")
            .after_pid_file(&pid_file)
            .hanging();

        let command = sleeper_with_pid_file(&pid_file);
        let config = no_warmup_config();
        let cancelled = tokio::time::timeout(
            Duration::from_secs(2),
            run(&command, &config, &generator),
        )
        .await;
        if cancelled.is_ok() {
            return Err("Expected run to be cancelled".to_owned());
        }

        let pid = read_pid(&pid_file)?;
        if !wait_for_exit(pid, EXIT_WAIT).await {
            return Err(format!("Server {} survived cancellation", pid));
        }
        Ok(())
    }
}
