//! Core library for the `benchmark` CLI.
//!
//! The binary launches each HTTP server under test as a subprocess, waits
//! until it accepts connections, drives it with `wrk` and reports the
//! requests/sec figure per server. The building blocks live here: target
//! command construction, the per-target runner with guaranteed process
//! teardown, the load generator seam and its output parser, the sequential
//! aggregator and the result report.
pub mod aggregate;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod loadgen;
pub mod logger;
pub mod report;
pub mod runner;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod target;
