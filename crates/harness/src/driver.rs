//! Experiment driver
//!
//! Sweeps the {mode x thread count x trial} matrix through a [`SimulationRunner`].
//! Invocations run strictly one after another; the only concurrency under test
//! lives inside the external program.

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{ConfigError, ExperimentConfig};
use crate::error::HarnessError;
use crate::mode::ExecutionMode;
use crate::results::RawResultSet;
use crate::runner::{RunnerError, SimulationRunner};
use crate::store::ResultStore;

/// Drives measurement sweeps for a fixed configuration
///
/// # Example
///
/// ```ignore
/// let runner = Arc::new(ProcessRunner::from_config(&config)?);
/// let driver = ExperimentDriver::new(config, runner)?.with_progress(true);
///
/// // Sweeps each mode and writes seq.json, par.json, ws.json
/// driver.run(&ResultStore::new("benchmark/bm_results"), &ExecutionMode::ALL).await?;
/// ```
pub struct ExperimentDriver {
    config: ExperimentConfig,
    runner: Arc<dyn SimulationRunner>,
    show_progress: bool,
}

impl ExperimentDriver {
    /// Create a driver; the configuration is validated once here
    pub fn new(
        config: ExperimentConfig,
        runner: Arc<dyn SimulationRunner>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            show_progress: false,
        })
    }

    /// Show a progress bar on stderr while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Sweep `modes` in order, writing each mode's artifact once its sweep completes
    ///
    /// The first failure aborts the run. Artifacts of modes that finished before
    /// the failure stay on disk; samples of the failing mode are discarded.
    pub async fn run(
        &self,
        store: &ResultStore,
        modes: &[ExecutionMode],
    ) -> Result<Vec<PathBuf>, HarnessError> {
        let progress = self.progress_bar(self.config.total_invocations(modes));
        let mut written = Vec::with_capacity(modes.len());

        for &mode in modes {
            tracing::info!(%mode, "Starting sweep");

            let results = match self.sweep_with(mode, &progress).await {
                Ok(results) => results,
                Err(e) => {
                    progress.abandon();
                    tracing::error!(%mode, error = %e, "Sweep aborted");
                    return Err(e.into());
                }
            };

            let path = store.write(mode, &results)?;
            tracing::info!(
                %mode,
                samples = results.sample_count(),
                path = %path.display(),
                "Sweep complete"
            );
            written.push(path);
        }

        progress.finish_and_clear();
        Ok(written)
    }

    /// Sweep a single mode and return its samples without persisting them
    pub async fn sweep(&self, mode: ExecutionMode) -> Result<RawResultSet, RunnerError> {
        self.sweep_with(mode, &ProgressBar::hidden()).await
    }

    async fn sweep_with(
        &self,
        mode: ExecutionMode,
        progress: &ProgressBar,
    ) -> Result<RawResultSet, RunnerError> {
        let mut results = RawResultSet::empty(mode);

        if !mode.is_threaded() {
            for trial in 0..self.config.sequential_trials {
                let seconds = self.invoke(mode, 1, trial, progress).await?;
                results.record(trial, seconds);
            }
            return Ok(results);
        }

        // Trial-outer / thread-inner keeps artifact shapes stable across runs
        for trial in 0..self.config.parallel_trials {
            for &threads in &self.config.thread_counts {
                let seconds = self.invoke(mode, threads, trial, progress).await?;
                results.record(threads, seconds);
            }
        }
        Ok(results)
    }

    async fn invoke(
        &self,
        mode: ExecutionMode,
        threads: u32,
        trial: u32,
        progress: &ProgressBar,
    ) -> Result<f64, RunnerError> {
        progress.set_message(format!("{mode} threads={threads} trial={trial}"));

        let seconds = self.runner.invoke(mode, threads).await?;

        tracing::debug!(%mode, threads, trial, seconds, "Trial complete");
        progress.inc(1);
        Ok(seconds)
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(total).with_style(style)
    }
}
