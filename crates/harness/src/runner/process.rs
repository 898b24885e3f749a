//! Runner that launches the simulation as a child process

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use super::{parse_timing, RunnerError, SimulationRunner};
use crate::config::{ConfigError, ExperimentConfig};
use crate::mode::ExecutionMode;

/// Launches `program [leading_args..] <input> <mode> <threads>` per invocation
///
/// # Example
///
/// ```ignore
/// use scalebench_harness::{ExecutionMode, ProcessRunner, SimulationRunner};
///
/// let runner = ProcessRunner::new("go", "benchmark/in_out/init_values.txt")
///     .with_args(["run", "editor/editor.go"]);
///
/// let seconds = runner.invoke(ExecutionMode::Parallel, 4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    leading_args: Vec<String>,
    input_path: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, input_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            input_path: input_path.into(),
            timeout: None,
        }
    }

    /// Build a runner from the command line and input file of an experiment
    pub fn from_config(config: &ExperimentConfig) -> Result<Self, ConfigError> {
        let (program, args) = config
            .command
            .split_first()
            .ok_or_else(|| ConfigError::invalid("command must name a program"))?;

        Ok(Self::new(program.clone(), &config.input_path)
            .with_args(args.iter().cloned())
            .with_timeout(config.timeout))
    }

    /// Arguments placed between the program and the positional arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the child and fail once it has run this long
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    fn command(&self, mode: ExecutionMode, threads: u32) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg(&self.input_path)
            .arg(mode.token())
            .arg(threads.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl SimulationRunner for ProcessRunner {
    async fn invoke(&self, mode: ExecutionMode, threads: u32) -> Result<f64, RunnerError> {
        let threads = mode.thread_arg(threads);
        let started = Instant::now();

        let child = self
            .command(mode, threads)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        tracing::debug!(program = %self.program, %mode, threads, "Spawned simulation");

        // Dropping the wait future on timeout drops the child, which kills it.
        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| RunnerError::Timeout {
                    mode,
                    threads,
                    limit,
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|source| RunnerError::Io {
            program: self.program.clone(),
            source,
        })?;

        tracing::debug!(
            %mode,
            threads,
            status = %output.status,
            wall_ms = started.elapsed().as_millis() as u64,
            "Simulation exited"
        );

        if !output.status.success() {
            return Err(RunnerError::ExternalProcess {
                mode,
                threads,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        parse_timing(mode, threads, &String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Runner executing an inline shell script; the positional arguments land in $1..$3
    fn shell(script: &str) -> ProcessRunner {
        ProcessRunner::new("sh", "init_values.txt").with_args(["-c", script, "sh"])
    }

    #[tokio::test]
    async fn test_parses_reported_seconds() {
        let runner = shell("printf '%s' 0.125");
        let seconds = runner.invoke(ExecutionMode::Parallel, 4).await.unwrap();
        assert_eq!(seconds, 0.125);
    }

    #[tokio::test]
    async fn test_passes_positional_arguments() {
        // Echo the arguments back as a number: threads / 10
        let runner = shell(r#"[ "$1" = init_values.txt ] && [ "$2" = ws ] && echo "0.$3""#);
        let seconds = runner.invoke(ExecutionMode::WorkStealing, 6).await.unwrap();
        assert_eq!(seconds, 0.6);
    }

    #[tokio::test]
    async fn test_sequential_passes_one_thread() {
        let runner = shell(r#"[ "$2" = seq ] && echo "$3""#);
        let seconds = runner.invoke(ExecutionMode::Sequential, 12).await.unwrap();
        assert_eq!(seconds, 1.0);
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let runner = shell("printf '  bad input file\\n' >&2; exit 1");
        let err = runner.invoke(ExecutionMode::Parallel, 2).await.unwrap_err();
        assert!(err.to_string().ends_with("): bad input file"));
        match err {
            RunnerError::ExternalProcess {
                mode,
                threads,
                status,
                stderr,
            } => {
                assert_eq!(mode, ExecutionMode::Parallel);
                assert_eq!(threads, 2);
                assert_eq!(status.code(), Some(1));
                assert_eq!(stderr, "  bad input file\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_stdout_is_malformed() {
        let runner = shell("echo 'Usage: editor <input_file> <seq/par/ws> <num_threads>'");
        let err = runner.invoke(ExecutionMode::Sequential, 1).await.unwrap_err();
        assert!(matches!(err, RunnerError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let runner = shell("sleep 5; echo 1.0").with_timeout(Some(Duration::from_millis(100)));
        let started = Instant::now();
        let err = runner.invoke(ExecutionMode::Parallel, 8).await.unwrap_err();
        assert!(matches!(err, RunnerError::Timeout { threads: 8, .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let runner = ProcessRunner::new("scalebench-no-such-program", "in.txt");
        let err = runner.invoke(ExecutionMode::Parallel, 2).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[test]
    fn test_from_config_splits_program_and_args() {
        let config = ExperimentConfig::default();
        let runner = ProcessRunner::from_config(&config).unwrap();
        assert_eq!(runner.program(), "go");
        assert_eq!(runner.leading_args, vec!["run", "editor/editor.go"]);
        assert_eq!(runner.input_path(), config.input_path.as_path());
    }

    #[test]
    fn test_from_config_rejects_empty_command() {
        let config = ExperimentConfig::default().with_command(Vec::<String>::new());
        assert!(ProcessRunner::from_config(&config).is_err());
    }
}
