// Measurement sweep command

use std::sync::Arc;

use anyhow::Result;
use scalebench_harness::{
    ExecutionMode, ExperimentDriver, HarnessConfig, HarnessError, ProcessRunner, ResultStore,
};

use super::failure;
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};

/// Sweep `modes` and write one artifact per mode
pub async fn run(
    config: &HarnessConfig,
    modes: &[ExecutionMode],
    output_format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let experiment = &config.experiment;
    let runner = ProcessRunner::from_config(experiment)?;
    let store = ResultStore::new(&config.results_dir);

    if output_format.is_text() && !quiet {
        print_field("Command", &experiment.command.join(" "));
        print_field("Input", &experiment.input_path.display().to_string());
        print_field(
            "Invocations",
            &experiment.total_invocations(modes).to_string(),
        );
        println!();
    }

    let driver = ExperimentDriver::new(experiment.clone(), Arc::new(runner))
        .map_err(|e| failure("sweep")(HarnessError::from(e)))?
        .with_progress(output_format.is_text() && !quiet);

    let written = driver.run(&store, modes).await.map_err(failure("sweep"))?;
    tracing::info!(
        artifacts = written.len(),
        results_dir = %store.dir().display(),
        "Sweep finished"
    );

    if output_format.is_text() {
        print_table_header(&[("MODE", 14), ("ARTIFACT", 60)]);
        for (mode, path) in modes.iter().zip(&written) {
            print_table_row(&[
                (mode.display_name(), 14),
                (&path.display().to_string(), 60),
            ]);
        }
    } else {
        let artifacts: Vec<_> = modes
            .iter()
            .zip(&written)
            .map(|(mode, path)| serde_json::json!({ "mode": mode, "path": path }))
            .collect();
        output_format.print_value(&serde_json::json!({ "artifacts": artifacts }))?;
    }

    Ok(())
}
