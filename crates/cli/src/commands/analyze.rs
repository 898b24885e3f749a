// Analysis and chart rendering command

use anyhow::Result;
use scalebench_harness::{
    analyze, render_report, AnalysisReport, ExecutionMode, HarnessConfig, HarnessError,
    ResultStore,
};

use super::failure;
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};

/// Analyze the stored artifacts of `modes` and optionally chart the speedups
pub fn run(
    config: &HarnessConfig,
    modes: &[ExecutionMode],
    render_charts: bool,
    output_format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let store = ResultStore::new(&config.results_dir);
    let report = analyze(&store, modes).map_err(failure("analysis"))?;

    let charts = if render_charts {
        render_report(&report, config.charts_dir(), &config.system_name)
            .map_err(|e| failure("chart rendering")(HarnessError::from(e)))?
    } else {
        Vec::new()
    };
    tracing::info!(
        modes = report.modes.len(),
        charts = charts.len(),
        "Analysis finished"
    );

    if output_format.is_text() {
        print_report(&report);
        if !quiet && !charts.is_empty() {
            println!();
            for path in &charts {
                print_field("Chart", &path.display().to_string());
            }
        }
    } else {
        output_format.print_value(&serde_json::json!({
            "report": report,
            "charts": charts,
        }))?;
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    print_field("Baseline", &format!("{:.6}s", report.baseline_mean));
    print_field("Trials", &report.sequential_trials.to_string());

    if report.modes.is_empty() {
        return;
    }

    println!();
    print_table_header(&[("MODE", 14), ("THREADS", 8), ("MEAN (s)", 12), ("SPEEDUP", 8)]);
    for row in rows(report) {
        print_table_row(&[
            (row.mode, 14),
            (&row.threads, 8),
            (&row.mean, 12),
            (&row.speedup, 8),
        ]);
    }
}

struct Row {
    mode: &'static str,
    threads: String,
    mean: String,
    speedup: String,
}

fn rows(report: &AnalysisReport) -> Vec<Row> {
    report
        .modes
        .iter()
        .flat_map(|mode_report| {
            mode_report.speedup.points().iter().map(move |point| Row {
                mode: mode_report.mode.display_name(),
                threads: point.threads.to_string(),
                mean: mode_report
                    .means
                    .get(point.threads)
                    .map(|mean| format!("{mean:.6}"))
                    .unwrap_or_default(),
                speedup: format!("{:.2}", point.speedup),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_rows_follow_thread_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("seq.json"), r#"{"0": 10.0, "1": 10.0}"#).unwrap();
        fs::write(dir.path().join("par.json"), r#"{"4": [2.5], "2": [5.0, 5.0]}"#).unwrap();

        let report = analyze(&ResultStore::new(dir.path()), &[ExecutionMode::Parallel]).unwrap();
        let rows = rows(&report);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mode, "Parallel");
        assert_eq!(rows[0].threads, "2");
        assert_eq!(rows[0].mean, "5.000000");
        assert_eq!(rows[0].speedup, "2.00");
        assert_eq!(rows[1].threads, "4");
        assert_eq!(rows[1].speedup, "4.00");
    }

    #[test]
    fn test_missing_results_report_store_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            results_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let err = run(&config, &ExecutionMode::ALL, false, OutputFormat::Json, true).unwrap_err();
        assert_eq!(err.to_string(), "analysis failed: StoreIOFailure");
    }
}
