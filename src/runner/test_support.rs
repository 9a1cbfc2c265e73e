use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{BenchConfig, ReadinessMode};
use crate::error::BenchError;
use crate::loadgen::LoadGenerator;
use crate::target::LaunchCommand;

const PID_FILE_WAIT: Duration = Duration::from_secs(5);
const PID_FILE_POLL: Duration = Duration::from_millis(10);

/// Load generator that returns a canned report without touching the network.
pub(crate) struct StaticOutput {
    output: String,
    /// Wait for this file before answering, so the server has recorded its pid.
    pid_file: Option<PathBuf>,
    delay: Duration,
    hang: bool,
}

impl StaticOutput {
    pub(crate) fn new(output: &str) -> Self {
        Self {
            output: output.to_owned(),
            pid_file: None,
            delay: Duration::ZERO,
            hang: false,
        }
    }

    pub(crate) fn after_pid_file(mut self, path: &Path) -> Self {
        self.pid_file = Some(path.to_path_buf());
        self
    }

    /// Take `delay` before answering, like a real load run.
    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Never return, so the caller has to be cancelled.
    pub(crate) fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }
}

#[async_trait]
impl LoadGenerator for StaticOutput {
    fn describe(&self, url: &str, duration: Duration) -> String {
        format!("static-output -d {:?} {}", duration, url)
    }

    async fn generate(&self, _url: &str, _duration: Duration) -> Result<String, BenchError> {
        if let Some(path) = self.pid_file.as_deref() {
            wait_for_file(path).await;
        }
        tokio::time::sleep(self.delay).await;
        if self.hang {
            std::future::pending::<()>().await;
        }
        Ok(self.output.clone())
    }
}

/// Load generator that always fails like a wrk that could not connect.
pub(crate) struct FailingGenerator;

#[async_trait]
impl LoadGenerator for FailingGenerator {
    fn describe(&self, url: &str, _duration: Duration) -> String {
        format!("failing {}", url)
    }

    async fn generate(&self, _url: &str, _duration: Duration) -> Result<String, BenchError> {
        Err(BenchError::LoadGeneratorLaunch {
            program: PathBuf::from("failing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no load generator"),
        })
    }
}

async fn wait_for_file(path: &Path) {
    let deadline = tokio::time::Instant::now() + PID_FILE_WAIT;
    while tokio::time::Instant::now() < deadline {
        if std::fs::read_to_string(path).is_ok_and(|content| content.ends_with('\n')) {
            return;
        }
        tokio::time::sleep(PID_FILE_POLL).await;
    }
}

/// Config that skips readiness checks entirely.
pub(crate) fn no_warmup_config() -> BenchConfig {
    BenchConfig {
        readiness: ReadinessMode::Sleep,
        warmup: Duration::ZERO,
        echo_output: false,
        ..BenchConfig::default()
    }
}

/// A long-lived dummy server.
pub(crate) fn sleeper() -> LaunchCommand {
    LaunchCommand::new("sleep").arg("30")
}

/// A dummy server that writes its pid to `pid_file` first.
pub(crate) fn sleeper_with_pid_file(pid_file: &Path) -> LaunchCommand {
    LaunchCommand::new("sh")
        .arg("-c")
        .arg(format!("echo $$ > '{}'; exec sleep 30", pid_file.display()))
}

pub(crate) fn read_pid(pid_file: &Path) -> Result<u32, String> {
    std::fs::read_to_string(pid_file)
        .map_err(|err| format!("read pid file failed: {}", err))?
        .trim()
        .parse()
        .map_err(|err| format!("parse pid failed: {}", err))
}

/// Whether `pid` is a live (non-zombie) process.
#[cfg(target_os = "linux")]
pub(crate) fn process_alive(pid: u32) -> bool {
    std::fs::read_to_string(format!("/proc/{}/stat", pid)).is_ok_and(|stat| {
        stat.rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .is_some_and(|state| state != "Z" && state != "X")
    })
}

/// Polls until `pid` is gone or `timeout` passes.
#[cfg(target_os = "linux")]
pub(crate) async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if !process_alive(pid) {
            return true;
        }
        tokio::time::sleep(PID_FILE_POLL).await;
    }
    !process_alive(pid)
}
