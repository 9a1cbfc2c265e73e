use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::BenchError;
use crate::target::LaunchCommand;

/// A running server under benchmark.
///
/// Spawned with `kill_on_drop`, so the process cannot outlive the guard even
/// when the owning future is cancelled. [`ServerProcess::terminate`] is the
/// normal exit path: it kills and reaps the process.
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
    command: String,
}

impl ServerProcess {
    /// Starts the server without waiting for it to do anything.
    ///
    /// Server stdout is discarded so it cannot interleave with the report;
    /// stderr is inherited.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Spawn`] when the program cannot be started.
    pub fn spawn(command: &LaunchCommand, working_dir: Option<&Path>) -> Result<Self, BenchError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|err| BenchError::Spawn {
            program: command.program.clone(),
            source: err,
        })?;
        debug!(pid = ?child.id(), "Spawned {}", command);
        Ok(Self {
            child,
            command: command.to_string(),
        })
    }

    /// Exit status if the process already ended.
    ///
    /// # Errors
    ///
    /// Returns an error when the process state cannot be queried.
    pub fn exit_status(&mut self) -> Result<Option<ExitStatus>, BenchError> {
        self.child
            .try_wait()
            .map_err(|err| BenchError::ProcessStatus { source: err })
    }

    /// Kills the process and waits for it to be reaped.
    pub async fn terminate(mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!("Server '{}' had already exited ({})", self.command, status);
                return;
            }
            Ok(None) => {}
            Err(err) => {
                warn!("Failed to poll server '{}': {}", self.command, err);
            }
        }

        match self.child.kill().await {
            Ok(()) => debug!("Server '{}' terminated", self.command),
            Err(err) => warn!("Failed to kill server '{}': {}", self.command, err),
        }
    }
}
