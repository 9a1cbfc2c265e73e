use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::LoadGenerator;
use crate::error::BenchError;

const WRK_DURATION_FLAG: &str = "-d";

/// Directory name of the prebuilt wrk binary for the host platform.
#[must_use]
pub fn wrk_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "mac",
        "windows" => "win",
        _ => "linux",
    }
}

/// `third_party/wrk/<platform>/wrk` under the repository root.
#[must_use]
pub fn default_wrk_path(root: &Path) -> PathBuf {
    root.join("third_party")
        .join("wrk")
        .join(wrk_platform())
        .join(format!("wrk{}", std::env::consts::EXE_SUFFIX))
}

/// The `wrk` HTTP benchmarking tool.
#[derive(Debug, Clone)]
pub struct Wrk {
    program: PathBuf,
}

impl Wrk {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn duration_arg(duration: Duration) -> String {
        // wrk only understands whole s/m/h units.
        format!("{}s", duration.as_secs().max(1))
    }
}

#[async_trait]
impl LoadGenerator for Wrk {
    fn describe(&self, url: &str, duration: Duration) -> String {
        format!(
            "{} {} {} {}",
            self.program.display(),
            WRK_DURATION_FLAG,
            Self::duration_arg(duration),
            url
        )
    }

    async fn generate(&self, url: &str, duration: Duration) -> Result<String, BenchError> {
        let output = Command::new(&self.program)
            .arg(WRK_DURATION_FLAG)
            .arg(Self::duration_arg(duration))
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| BenchError::LoadGeneratorLaunch {
                program: self.program.clone(),
                source: err,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            status = %output.status,
            stdout_len = stdout.len(),
            stderr_len = stderr.len(),
            "Load generator finished"
        );

        if !output.status.success() {
            let detail = [stdout.trim(), stderr.trim()]
                .into_iter()
                .filter(|stream| !stream.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(BenchError::LoadGeneratorStatus {
                status: output.status,
                output: detail,
            });
        }

        let mut combined = stdout.into_owned();
        combined.push_str(&stderr);
        Ok(combined)
    }
}
