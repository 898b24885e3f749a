//! Execution modes of the simulation under test

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which execution strategy the simulation runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Single-threaded baseline
    Sequential,
    /// Fixed-size thread pool
    Parallel,
    /// Work-stealing scheduler
    WorkStealing,
}

/// Error returned when a mode token is not recognized
#[derive(Debug, Error)]
#[error("unknown execution mode '{0}' (expected one of: seq, par, ws)")]
pub struct ParseModeError(String);

impl ExecutionMode {
    /// Every mode, in sweep order
    pub const ALL: [ExecutionMode; 3] = [Self::Sequential, Self::Parallel, Self::WorkStealing];

    /// The modes that produce speedup curves
    pub const PARALLEL: [ExecutionMode; 2] = [Self::Parallel, Self::WorkStealing];

    /// Token passed to the external executable
    pub fn token(self) -> &'static str {
        match self {
            Self::Sequential => "seq",
            Self::Parallel => "par",
            Self::WorkStealing => "ws",
        }
    }

    /// Whether this mode is swept over thread counts
    pub fn is_threaded(self) -> bool {
        !matches!(self, Self::Sequential)
    }

    /// Thread-count argument for an invocation; always 1 for sequential runs
    pub fn thread_arg(self, threads: u32) -> u32 {
        if self.is_threaded() {
            threads
        } else {
            1
        }
    }

    /// File name of the raw result artifact for this mode
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::Sequential => "seq.json",
            Self::Parallel => "par.json",
            Self::WorkStealing => "ws.json",
        }
    }

    /// File name of the speedup chart for this mode
    pub fn chart_name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential.png",
            Self::Parallel => "parallel.png",
            Self::WorkStealing => "work_stealing.png",
        }
    }

    /// Human-readable name used in chart titles and tables
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sequential => "Sequential",
            Self::Parallel => "Parallel",
            Self::WorkStealing => "Work Stealing",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ExecutionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seq" | "sequential" => Ok(Self::Sequential),
            "par" | "parallel" => Ok(Self::Parallel),
            "ws" | "work_stealing" | "work-stealing" => Ok(Self::WorkStealing),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for mode in ExecutionMode::ALL {
            assert_eq!(mode.token().parse::<ExecutionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_long_names_parse() {
        assert_eq!(
            "work-stealing".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::WorkStealing
        );
        assert_eq!(
            "Parallel".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Parallel
        );
        assert!("gpu".parse::<ExecutionMode>().is_err());
    }

    #[test]
    fn test_sequential_always_passes_one_thread() {
        assert_eq!(ExecutionMode::Sequential.thread_arg(8), 1);
        assert_eq!(ExecutionMode::Parallel.thread_arg(8), 8);
        assert_eq!(ExecutionMode::WorkStealing.thread_arg(12), 12);
    }

    #[test]
    fn test_artifact_names_are_distinct() {
        assert_eq!(ExecutionMode::Sequential.artifact_name(), "seq.json");
        assert_eq!(ExecutionMode::Parallel.artifact_name(), "par.json");
        assert_eq!(ExecutionMode::WorkStealing.artifact_name(), "ws.json");
    }
}
