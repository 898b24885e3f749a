// Command-line overrides layered onto the YAML configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use scalebench_harness::{ExecutionMode, HarnessConfig};

/// Sweep parameters; each one overrides the config file when given
#[derive(Args, Debug, Default)]
pub struct ExperimentArgs {
    /// Input file passed to every simulation run
    #[arg(long, short, env = "SCALEBENCH_INPUT")]
    pub input: Option<PathBuf>,

    /// Number of sequential baseline trials
    #[arg(long, env = "SCALEBENCH_SEQ_TRIALS")]
    pub seq_trials: Option<u32>,

    /// Trials per thread count for the threaded modes
    #[arg(long, env = "SCALEBENCH_TRIALS")]
    pub trials: Option<u32>,

    /// Thread counts to sweep, comma separated
    #[arg(long, value_delimiter = ',', env = "SCALEBENCH_THREADS")]
    pub threads: Option<Vec<u32>>,

    /// Per-invocation time limit in seconds
    #[arg(long, env = "SCALEBENCH_TIMEOUT")]
    pub timeout: Option<f64>,

    /// Simulation program and its leading arguments
    #[arg(last = true)]
    pub command: Vec<String>,
}

/// Where artifacts are read from and written to
#[derive(Args, Debug, Default)]
pub struct LocationArgs {
    /// Directory holding seq.json, par.json and ws.json
    #[arg(long, env = "SCALEBENCH_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Directory for chart images (defaults to the results directory)
    #[arg(long, env = "SCALEBENCH_CHARTS_DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Name of the simulated system, shown in chart titles
    #[arg(long, env = "SCALEBENCH_SYSTEM_NAME")]
    pub system_name: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ModeArgs {
    /// Execution modes to include: seq, par, ws (repeatable, default all)
    #[arg(long = "mode", short = 'm', value_delimiter = ',')]
    pub modes: Vec<ExecutionMode>,
}

impl ModeArgs {
    /// Selected modes in canonical order, without duplicates
    pub fn selected(&self) -> Vec<ExecutionMode> {
        if self.modes.is_empty() {
            return ExecutionMode::ALL.to_vec();
        }
        ExecutionMode::ALL
            .into_iter()
            .filter(|mode| self.modes.contains(mode))
            .collect()
    }
}

/// Build the effective configuration
///
/// Sweep parameters are validated only when `experiment` is given, since
/// analysis never touches them.
pub fn load(
    config_path: Option<&Path>,
    experiment: Option<&ExperimentArgs>,
    locations: &LocationArgs,
) -> Result<HarnessConfig> {
    let mut config = match config_path {
        Some(path) => HarnessConfig::from_yaml_file(path)?,
        None => HarnessConfig::default(),
    };

    if let Some(dir) = &locations.results_dir {
        config.results_dir = dir.clone();
    }
    if let Some(dir) = &locations.charts_dir {
        config.charts_dir = Some(dir.clone());
    }
    if let Some(name) = &locations.system_name {
        config.system_name = name.clone();
    }

    if let Some(args) = experiment {
        apply_experiment(&mut config, args)?;
        config.validate()?;
    }

    Ok(config)
}

fn apply_experiment(config: &mut HarnessConfig, args: &ExperimentArgs) -> Result<()> {
    let experiment = &mut config.experiment;

    if !args.command.is_empty() {
        experiment.command = args.command.clone();
    }
    if let Some(input) = &args.input {
        experiment.input_path = input.clone();
    }
    if let Some(trials) = args.seq_trials {
        experiment.sequential_trials = trials;
    }
    if let Some(trials) = args.trials {
        experiment.parallel_trials = trials;
    }
    if let Some(threads) = &args.threads {
        experiment.thread_counts = threads.clone();
    }
    if let Some(seconds) = args.timeout {
        let limit = Duration::try_from_secs_f64(seconds)
            .with_context(|| format!("invalid timeout: {seconds}"))?;
        experiment.timeout = Some(limit);
    }
    Ok(())
}
