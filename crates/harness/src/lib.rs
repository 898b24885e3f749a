//! # Scaling Harness
//!
//! Measures the scaling behavior of an external simulation program across three
//! execution strategies: sequential, fixed thread pool and work stealing.
//!
//! ## Features
//!
//! - **Subprocess port**: the simulation is reached only through [`SimulationRunner`],
//!   so tests can swap in [`ScriptedRunner`] instead of spawning processes
//! - **Experiment sweeps**: trial-outer / thread-inner matrix sweeps per mode
//! - **Result artifacts**: one JSON file per mode, written after a full sweep
//! - **Analysis**: per-configuration means and speedup curves against the sequential baseline
//! - **Charts**: PNG line charts of speedup vs. thread count
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ExperimentDriver                         │
//! │  (sweeps mode x threads x trial, one invocation at a time)  │
//! └─────────────────────────────────────────────────────────────┘
//!               │                                │
//!               ▼                                ▼
//! ┌──────────────────────────┐    ┌──────────────────────────────┐
//! │    SimulationRunner       │    │        ResultStore            │
//! │  (child process → f64)    │    │  (seq.json / par.json / ...)  │
//! └──────────────────────────┘    └──────────────────────────────┘
//!                                                │
//!                                                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │           analyze → AnalysisReport → SpeedupChart           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use scalebench_harness::prelude::*;
//!
//! let config = HarnessConfig::default();
//! let runner = ProcessRunner::from_config(&config.experiment)?;
//! let store = ResultStore::new(&config.results_dir);
//!
//! let driver = ExperimentDriver::new(config.experiment.clone(), Arc::new(runner))?;
//! driver.run(&store, &ExecutionMode::ALL).await?;
//!
//! let report = analyze(&store, &ExecutionMode::PARALLEL)?;
//! ```

pub mod analysis;
pub mod chart;
pub mod config;
pub mod driver;
pub mod error;
pub mod mode;
pub mod results;
pub mod runner;
pub mod store;
pub mod telemetry;

/// Prelude for common imports
pub mod prelude {
    pub use crate::analysis::{
        aggregate, analyze, baseline_mean, speedup, AggregatedResult, AnalysisError,
        AnalysisReport, ModeReport, SpeedupCurve, SpeedupPoint,
    };
    pub use crate::chart::{render_report, ChartError, SpeedupChart};
    pub use crate::config::{ConfigError, ExperimentConfig, HarnessConfig};
    pub use crate::driver::ExperimentDriver;
    pub use crate::error::HarnessError;
    pub use crate::mode::ExecutionMode;
    pub use crate::results::RawResultSet;
    pub use crate::runner::{ProcessRunner, RunnerError, ScriptedRunner, SimulationRunner};
    pub use crate::store::{ResultStore, StoreError};
}

// Re-export key types at crate root
pub use analysis::{analyze, AggregatedResult, AnalysisError, AnalysisReport, SpeedupCurve};
pub use chart::{render_report, ChartError, SpeedupChart};
pub use config::{ConfigError, ExperimentConfig, HarnessConfig};
pub use driver::ExperimentDriver;
pub use error::HarnessError;
pub use mode::ExecutionMode;
pub use results::RawResultSet;
pub use runner::{ProcessRunner, RunnerError, ScriptedRunner, SimulationRunner};
pub use store::{ResultStore, StoreError};
