// Scalebench CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Flags override the YAML config file, which overrides built-in defaults.

mod commands;
mod output;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scalebench_harness::telemetry::{init_telemetry, TelemetryConfig};

use crate::settings::{ExperimentArgs, LocationArgs, ModeArgs};

#[derive(Parser)]
#[command(name = "scalebench")]
#[command(about = "Scalebench CLI - Measure and chart the speedup of a parallel simulation")]
#[command(version)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, short, global = true, env = "SCALEBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep every configuration and write the raw result artifacts
    Run {
        #[command(flatten)]
        experiment: ExperimentArgs,

        #[command(flatten)]
        locations: LocationArgs,

        #[command(flatten)]
        modes: ModeArgs,
    },

    /// Compute speedups from stored results and render charts
    Analyze {
        #[command(flatten)]
        locations: LocationArgs,

        #[command(flatten)]
        modes: ModeArgs,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },

    /// Run the sweep, then analyze its results
    Pipeline {
        #[command(flatten)]
        experiment: ExperimentArgs,

        #[command(flatten)]
        locations: LocationArgs,

        #[command(flatten)]
        modes: ModeArgs,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output_format = output::OutputFormat::from_str(&cli.output);

    let mut telemetry = TelemetryConfig::from_env();
    if cli.quiet && telemetry.log_filter.is_none() {
        telemetry.log_filter = Some("warn".to_string());
    }
    init_telemetry(telemetry);

    match cli.command {
        Commands::Run {
            experiment,
            locations,
            modes,
        } => {
            let config = settings::load(cli.config.as_deref(), Some(&experiment), &locations)?;
            commands::run::run(&config, &modes.selected(), output_format, cli.quiet).await
        }
        Commands::Analyze {
            locations,
            modes,
            no_charts,
        } => {
            let config = settings::load(cli.config.as_deref(), None, &locations)?;
            commands::analyze::run(&config, &modes.selected(), !no_charts, output_format, cli.quiet)
        }
        Commands::Pipeline {
            experiment,
            locations,
            modes,
            no_charts,
        } => {
            let config = settings::load(cli.config.as_deref(), Some(&experiment), &locations)?;
            let modes = modes.selected();
            commands::run::run(&config, &modes, output_format, cli.quiet).await?;
            commands::analyze::run(&config, &modes, !no_charts, output_format, cli.quiet)
        }
    }
}
