//! Servers under benchmark and how each one is launched.
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

/// Script served by the target under test, relative to the repository root.
const DENO_HTTP_SCRIPT: &str = "tests/http_bench.ts";
const NODE_HTTP_SCRIPT: &str = "tools/node_http.js";
const NODE_TCP_SCRIPT: &str = "tools/node_tcp.js";
const NODE_PROGRAM: &str = "node";

/// Exact command line used to start a server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Selector used by `--only` and the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Deno,
    Node,
    #[value(name = "node_tcp")]
    NodeTcp,
    Hyper,
}

impl TargetKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TargetKind::Deno => "deno",
            TargetKind::Node => "node",
            TargetKind::NodeTcp => "node_tcp",
            TargetKind::Hyper => "hyper",
        }
    }
}

/// One server implementation to benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The server under test, fed the full `ip:port` address.
    Deno { exe: PathBuf },
    /// Node's `http` module reference server.
    NodeHttp,
    /// Node raw TCP reference server answering with a canned HTTP response.
    NodeTcp,
    /// Rust hyper "hello world" reference server.
    Hyper { exe: PathBuf },
}

impl Target {
    /// All four targets in reporting order.
    #[must_use]
    pub fn all(deno_exe: &Path, hyper_exe: &Path) -> Vec<Target> {
        vec![
            Target::Deno {
                exe: deno_exe.to_path_buf(),
            },
            Target::NodeHttp,
            Target::NodeTcp,
            Target::Hyper {
                exe: hyper_exe.to_path_buf(),
            },
        ]
    }

    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Target::Deno { .. } => TargetKind::Deno,
            Target::NodeHttp => TargetKind::Node,
            Target::NodeTcp => TargetKind::NodeTcp,
            Target::Hyper { .. } => TargetKind::Hyper,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind().label()
    }

    /// Builds the command line that makes this server listen on `addr`.
    ///
    /// The deno server takes the whole address; the reference servers only
    /// take the port and bind on their own.
    #[must_use]
    pub fn command(&self, addr: SocketAddr) -> LaunchCommand {
        let port = addr.port().to_string();
        match self {
            Target::Deno { exe } => LaunchCommand::new(exe)
                .arg("--allow-net")
                .arg(DENO_HTTP_SCRIPT)
                .arg(addr.to_string()),
            Target::NodeHttp => LaunchCommand::new(NODE_PROGRAM)
                .arg(NODE_HTTP_SCRIPT)
                .arg(port),
            Target::NodeTcp => LaunchCommand::new(NODE_PROGRAM)
                .arg(NODE_TCP_SCRIPT)
                .arg(port),
            Target::Hyper { exe } => LaunchCommand::new(exe).arg(port),
        }
    }
}

/// Default location of the hyper reference server: next to the deno binary.
#[must_use]
pub fn default_hyper_exe(deno_exe: &Path) -> PathBuf {
    deno_exe.with_file_name(format!("hyper_hello{}", std::env::consts::EXE_SUFFIX))
}
