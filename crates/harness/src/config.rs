//! Experiment and harness configuration
//!
//! Sweep parameters are an immutable value handed to the driver at construction.
//! Values come from built-in defaults, an optional YAML file, and CLI overrides.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid YAML for [`HarnessConfig`]
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Values that cannot drive a sweep
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Parameters of one measurement sweep
///
/// # Example
///
/// ```
/// use scalebench_harness::ExperimentConfig;
/// use std::time::Duration;
///
/// let config = ExperimentConfig::default()
///     .with_command(["./target/release/nbody"])
///     .with_thread_counts([2, 4, 8])
///     .with_parallel_trials(3)
///     .with_timeout(Some(Duration::from_secs(600)));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_invocations(&[]), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Program followed by any arguments placed before the positional ones
    pub command: Vec<String>,

    /// Input file handed to every invocation
    pub input_path: PathBuf,

    /// Number of sequential baseline trials
    pub sequential_trials: u32,

    /// Number of trials per thread count for threaded modes
    pub parallel_trials: u32,

    /// Thread counts swept for threaded modes, in sweep order
    pub thread_counts: Vec<u32>,

    /// Per-invocation limit (None = wait indefinitely)
    #[serde(with = "option_duration_secs")]
    pub timeout: Option<Duration>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            command: vec!["go".into(), "run".into(), "editor/editor.go".into()],
            input_path: PathBuf::from("benchmark/in_out/init_values.txt"),
            sequential_trials: 5,
            parallel_trials: 5,
            thread_counts: vec![2, 4, 6, 8, 12],
            timeout: None,
        }
    }
}

impl ExperimentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_sequential_trials(mut self, trials: u32) -> Self {
        self.sequential_trials = trials;
        self
    }

    pub fn with_parallel_trials(mut self, trials: u32) -> Self {
        self.parallel_trials = trials;
        self
    }

    pub fn with_thread_counts(mut self, thread_counts: impl IntoIterator<Item = u32>) -> Self {
        self.thread_counts = thread_counts.into_iter().collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the configuration can drive a sweep
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.command.first() {
            Some(program) if !program.trim().is_empty() => {}
            _ => return Err(ConfigError::invalid("command must name a program")),
        }
        if self.sequential_trials == 0 {
            return Err(ConfigError::invalid("sequential_trials must be at least 1"));
        }
        if self.parallel_trials == 0 {
            return Err(ConfigError::invalid("parallel_trials must be at least 1"));
        }
        if self.thread_counts.is_empty() {
            return Err(ConfigError::invalid("thread_counts must not be empty"));
        }
        if self.thread_counts.contains(&0) {
            return Err(ConfigError::invalid("thread counts must be positive"));
        }
        let unique: BTreeSet<u32> = self.thread_counts.iter().copied().collect();
        if unique.len() != self.thread_counts.len() {
            return Err(ConfigError::invalid(format!(
                "thread_counts contains duplicates: {:?}",
                self.thread_counts
            )));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::invalid("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Number of invocations a sweep over `modes` performs
    pub fn total_invocations(&self, modes: &[crate::ExecutionMode]) -> u64 {
        modes
            .iter()
            .map(|mode| {
                if mode.is_threaded() {
                    u64::from(self.parallel_trials) * self.thread_counts.len() as u64
                } else {
                    u64::from(self.sequential_trials)
                }
            })
            .sum()
    }
}

/// Full harness configuration: sweep parameters plus artifact locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    pub experiment: ExperimentConfig,

    /// Directory holding seq.json / par.json / ws.json
    pub results_dir: PathBuf,

    /// Directory for chart images (defaults to `results_dir`)
    pub charts_dir: Option<PathBuf>,

    /// Name of the simulated system, used in chart titles
    pub system_name: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentConfig::default(),
            results_dir: PathBuf::from("benchmark/bm_results"),
            charts_dir: None,
            system_name: "Gravitational RK4 System".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load from a YAML file; missing keys keep their defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document means "all defaults"
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn charts_dir(&self) -> &Path {
        self.charts_dir.as_deref().unwrap_or(&self.results_dir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.experiment.validate()
    }
}

mod option_duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|d| d.as_secs_f64()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<f64>::deserialize(deserializer)?;
        secs.map(|s| Duration::try_from_secs_f64(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
