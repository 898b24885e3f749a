//! Top-level error for pipeline operations

use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::chart::ChartError;
use crate::config::ConfigError;
use crate::runner::RunnerError;
use crate::store::StoreError;

/// Any failure that aborts a sweep or an analysis run
///
/// Nothing in the pipeline retries; callers report the error and stop.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Stable failure-kind name shown to operators
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Runner(RunnerError::ExternalProcess { .. })
            | Self::Runner(RunnerError::Spawn { .. })
            | Self::Runner(RunnerError::Io { .. }) => "ExternalProcessFailure",
            Self::Runner(RunnerError::MalformedOutput { .. }) => "MalformedOutputFailure",
            Self::Runner(RunnerError::Timeout { .. }) => "TimeoutFailure",
            Self::Store(_) => "StoreIOFailure",
            Self::Analysis(AnalysisError::NoSamples { .. }) => "NoSamplesFailure",
            Self::Analysis(AnalysisError::InvalidTiming { .. }) => "InvalidTimingFailure",
            Self::Chart(_) => "ChartRenderFailure",
            Self::Config(_) => "ConfigurationFailure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExecutionMode;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_kinds() {
        let timeout: HarnessError = RunnerError::Timeout {
            mode: ExecutionMode::Parallel,
            threads: 4,
            limit: Duration::from_secs(1),
        }
        .into();
        assert_eq!(timeout.kind(), "TimeoutFailure");

        let missing: HarnessError = StoreError::Missing {
            mode: ExecutionMode::Sequential,
            path: PathBuf::from("seq.json"),
        }
        .into();
        assert_eq!(missing.kind(), "StoreIOFailure");

        let empty: HarnessError = AnalysisError::NoSamples { key: Some(2) }.into();
        assert_eq!(empty.kind(), "NoSamplesFailure");
        assert_eq!(empty.to_string(), "no samples to aggregate for key 2");

        let invalid: HarnessError = AnalysisError::InvalidTiming {
            key: None,
            value: 0.0,
        }
        .into();
        assert_eq!(invalid.kind(), "InvalidTimingFailure");
    }
}
