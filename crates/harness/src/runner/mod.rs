//! Subprocess port for the simulation under test
//!
//! This module provides:
//! - [`SimulationRunner`] trait: one invocation in, one timing out
//! - [`ProcessRunner`] spawning the real executable
//! - [`ScriptedRunner`] for testing

mod process;
mod scripted;

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::mode::ExecutionMode;

pub use process::ProcessRunner;
pub use scripted::{Invocation, ScriptedRunner};

/// Errors from a single simulation invocation
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Child exited with a non-zero status; `stderr` holds everything it wrote
    #[error("external process failed for {mode} with {threads} thread(s) ({status}): {}", .stderr.trim())]
    ExternalProcess {
        mode: ExecutionMode,
        threads: u32,
        status: ExitStatus,
        stderr: String,
    },

    /// Stdout was not exactly one floating-point literal
    #[error("malformed output for {mode} with {threads} thread(s): expected one number, got {stdout:?}")]
    MalformedOutput {
        mode: ExecutionMode,
        threads: u32,
        stdout: String,
    },

    /// Child did not exit within the configured limit and was killed
    #[error("simulation for {mode} with {threads} thread(s) timed out after {limit:?}")]
    Timeout {
        mode: ExecutionMode,
        threads: u32,
        limit: Duration,
    },

    /// Executable could not be started
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting on the child or reading its pipes failed
    #[error("failed to collect output of '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Port to the external simulation program
///
/// An invocation blocks (asynchronously) until the program has exited and
/// yields the elapsed seconds it reported.
#[async_trait]
pub trait SimulationRunner: Send + Sync {
    /// Run the simulation once; `threads` is ignored for sequential runs
    async fn invoke(&self, mode: ExecutionMode, threads: u32) -> Result<f64, RunnerError>;
}

/// Parse the single timing value a simulation prints on stdout
pub fn parse_timing(mode: ExecutionMode, threads: u32, stdout: &str) -> Result<f64, RunnerError> {
    let malformed = || RunnerError::MalformedOutput {
        mode,
        threads,
        stdout: stdout.to_string(),
    };

    let seconds: f64 = stdout.trim().parse().map_err(|_| malformed())?;
    if !seconds.is_finite() {
        return Err(malformed());
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timing_accepts_go_float_format() {
        let seconds = parse_timing(ExecutionMode::Parallel, 4, "1.234567").unwrap();
        assert_eq!(seconds, 1.234567);
    }

    #[test]
    fn test_parse_timing_trims_whitespace() {
        let seconds = parse_timing(ExecutionMode::Sequential, 1, "  0.5\n").unwrap();
        assert_eq!(seconds, 0.5);
    }

    #[test]
    fn test_parse_timing_rejects_extra_output() {
        let err = parse_timing(ExecutionMode::Parallel, 2, "1.0 2.0").unwrap_err();
        assert!(matches!(err, RunnerError::MalformedOutput { threads: 2, .. }));
    }

    #[test]
    fn test_parse_timing_rejects_usage_text() {
        let usage = "Usage: go run editor.go <input_file> <seq/par/ws> <num_threads>";
        let err = parse_timing(ExecutionMode::WorkStealing, 8, usage).unwrap_err();
        match err {
            RunnerError::MalformedOutput { stdout, .. } => assert_eq!(stdout, usage),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_timing_rejects_non_finite() {
        assert!(parse_timing(ExecutionMode::Sequential, 1, "NaN").is_err());
        assert!(parse_timing(ExecutionMode::Sequential, 1, "inf").is_err());
    }
}
