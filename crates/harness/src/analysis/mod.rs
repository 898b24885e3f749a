//! Analysis of stored results
//!
//! Loads the result artifacts, reduces them to means, and derives a speedup
//! curve for every threaded mode against the sequential baseline. Everything
//! here is recomputed on each run and never persisted.

mod aggregate;
mod speedup;

use serde::Serialize;
use thiserror::Error;

use crate::error::HarnessError;
use crate::mode::ExecutionMode;
use crate::store::ResultStore;

pub use aggregate::{aggregate, baseline_mean, AggregatedResult};
pub use speedup::{speedup, SpeedupCurve, SpeedupPoint};

/// Analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A key (or the whole set when `key` is None) has no samples
    #[error("no samples to aggregate{}", key_suffix(.key))]
    NoSamples { key: Option<u32> },

    /// A timing (or the baseline when `key` is None) is not strictly positive
    #[error("invalid timing {value}{}: execution time must be positive", key_suffix(.key))]
    InvalidTiming { key: Option<u32>, value: f64 },
}

fn key_suffix(key: &Option<u32>) -> String {
    match key {
        Some(key) => format!(" for key {key}"),
        None => String::new(),
    }
}

/// Means and speedup curve of one threaded mode
#[derive(Debug, Clone, Serialize)]
pub struct ModeReport {
    pub mode: ExecutionMode,
    pub means: AggregatedResult,
    pub speedup: SpeedupCurve,
}

/// Result of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Mean of all sequential trials, in seconds
    pub baseline_mean: f64,
    pub sequential_trials: usize,
    pub modes: Vec<ModeReport>,
}

impl AnalysisReport {
    pub fn mode(&self, mode: ExecutionMode) -> Option<&ModeReport> {
        self.modes.iter().find(|r| r.mode == mode)
    }
}

/// Analyze the stored results of `modes` against the sequential baseline
///
/// Sequential entries in `modes` are skipped; the baseline is always loaded.
/// Any missing or invalid artifact aborts the whole analysis.
pub fn analyze(store: &ResultStore, modes: &[ExecutionMode]) -> Result<AnalysisReport, HarnessError> {
    let sequential = store.read(ExecutionMode::Sequential)?;
    let baseline = baseline_mean(&sequential)?;

    tracing::info!(
        baseline_mean = baseline,
        trials = sequential.sample_count(),
        "Loaded sequential baseline"
    );

    let mut reports = Vec::new();
    for &mode in modes.iter().filter(|m| m.is_threaded()) {
        let results = store.read(mode)?;
        let means = aggregate(&results)?;
        let curve = speedup(baseline, &means)?;

        tracing::info!(
            %mode,
            thread_counts = means.len(),
            max_speedup = curve.max_speedup().unwrap_or_default(),
            "Computed speedup curve"
        );

        reports.push(ModeReport {
            mode,
            means,
            speedup: curve,
        });
    }

    Ok(AnalysisReport {
        baseline_mean: baseline,
        sequential_trials: sequential.sample_count(),
        modes: reports,
    })
}
