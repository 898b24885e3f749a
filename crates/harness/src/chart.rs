//! Speedup charts
//!
//! Draws speedup vs. thread count as a PNG line chart, one image per threaded mode.

use std::error::Error as StdError;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

use crate::analysis::{AnalysisReport, SpeedupCurve};
use crate::mode::ExecutionMode;

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    /// Nothing to plot
    #[error("cannot render an empty speedup curve")]
    EmptyCurve,

    /// Output directory could not be created
    #[error("failed to create chart directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Drawing or encoding the image failed
    #[error("failed to render chart {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },
}

/// Labels and size of a single-series speedup chart
#[derive(Debug, Clone)]
pub struct SpeedupChart {
    pub title: String,
    pub curve_label: String,
    pub x_label: String,
    pub y_label: String,
    /// Image size in pixels (width, height)
    pub size: (u32, u32),
}

impl SpeedupChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            curve_label: "Speedup".to_string(),
            x_label: "Number of threads".to_string(),
            y_label: "Speedup".to_string(),
            size: (1024, 768),
        }
    }

    /// Chart titled "<Mode> Speedup Performance for <system>"
    pub fn for_mode(mode: ExecutionMode, system_name: &str) -> Self {
        Self::new(format!(
            "{} Speedup Performance for {}",
            mode.display_name(),
            system_name
        ))
        .with_curve_label(format!("{} Run", mode.display_name()))
    }

    pub fn with_curve_label(mut self, label: impl Into<String>) -> Self {
        self.curve_label = label.into();
        self
    }

    pub fn with_axis_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Draw `curve` and write the image to `output`
    pub fn render(&self, curve: &SpeedupCurve, output: &Path) -> Result<(), ChartError> {
        let (x_range, y_range) = axis_ranges(curve).ok_or(ChartError::EmptyCurve)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ChartError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.draw(curve, output, x_range, y_range)
            .map_err(|e| ChartError::Render {
                path: output.to_path_buf(),
                message: e.to_string(),
            })?;

        tracing::info!(path = %output.display(), title = %self.title, "Rendered speedup chart");
        Ok(())
    }

    fn draw(
        &self,
        curve: &SpeedupCurve,
        output: &Path,
        x_range: Range<u32>,
        y_range: Range<f64>,
    ) -> Result<(), Box<dyn StdError>> {
        let root = BitMapBackend::new(output, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc(&self.x_label)
            .y_desc(&self.y_label)
            .x_labels(curve.len().max(2))
            .draw()?;

        let points: Vec<(u32, f64)> = curve.points().iter().map(|p| (p.threads, p.speedup)).collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))?
            .label(&self.curve_label)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart.draw_series(
            points
                .iter()
                .map(|&(threads, speedup)| Circle::new((threads, speedup), 4, BLUE.filled())),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

/// Render one chart per mode in `report` into `dir`
///
/// Returns the written image paths in report order.
pub fn render_report(
    report: &AnalysisReport,
    dir: &Path,
    system_name: &str,
) -> Result<Vec<PathBuf>, ChartError> {
    report
        .modes
        .iter()
        .map(|mode_report| {
            let path = dir.join(mode_report.mode.chart_name());
            SpeedupChart::for_mode(mode_report.mode, system_name)
                .render(&mode_report.speedup, &path)?;
            Ok(path)
        })
        .collect()
}

/// Axis ranges that fit every point, with headroom above the top speedup
fn axis_ranges(curve: &SpeedupCurve) -> Option<(Range<u32>, Range<f64>)> {
    let (min_threads, max_threads) = curve.thread_range()?;
    let x_range = if min_threads == max_threads {
        min_threads.saturating_sub(1)..max_threads + 1
    } else {
        min_threads..max_threads
    };

    let top = curve.max_speedup()?.max(1.0) * 1.1;
    Some((x_range, 0.0..top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, speedup, AggregatedResult};
    use crate::store::ResultStore;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    fn is_png(path: &Path) -> bool {
        fs::read(path).map(|bytes| bytes.starts_with(&PNG_MAGIC)).unwrap_or(false)
    }

    fn curve(means: &[(u32, f64)], baseline: f64) -> SpeedupCurve {
        let means: AggregatedResult = means.iter().copied().collect();
        speedup(baseline, &means).unwrap()
    }

    #[test]
    fn test_axis_ranges_cover_points() {
        let curve = curve(&[(2, 5.0), (4, 2.5), (12, 1.0)], 10.0);
        let (x, y) = axis_ranges(&curve).unwrap();

        assert_eq!(x, 2..12);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_ranges_single_point() {
        let curve = curve(&[(4, 20.0)], 10.0);
        let (x, y) = axis_ranges(&curve).unwrap();

        assert_eq!(x, 3..5);
        // Slowdowns still show the y = 1 reference level
        assert!((y.end - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_curve_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpeedupChart::new("empty")
            .render(&SpeedupCurve::default(), &dir.path().join("empty.png"))
            .unwrap_err();
        assert!(matches!(err, ChartError::EmptyCurve));
        assert!(!dir.path().join("empty.png").exists());
    }

    #[test]
    fn test_unwritable_output_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let curve = curve(&[(2, 5.0), (4, 2.5)], 10.0);

        // The output path is an existing directory
        let result = SpeedupChart::new("blocked").render(&curve, dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_titles_follow_mode() {
        let chart = SpeedupChart::for_mode(ExecutionMode::WorkStealing, "Gravitational RK4 System");
        assert_eq!(
            chart.title,
            "Work Stealing Speedup Performance for Gravitational RK4 System"
        );
        assert_eq!(chart.curve_label, "Work Stealing Run");
        assert_eq!(chart.x_label, "Number of threads");
        assert_eq!(chart.y_label, "Speedup");
    }

    #[test]
    fn test_render_report_writes_one_png_per_mode() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("seq.json"), r#"{"0": 10.0, "1": 11.0, "2": 9.0}"#).unwrap();
        fs::write(dir.path().join("par.json"), r#"{"2": [5.0, 5.0], "4": [2.5, 2.5]}"#).unwrap();
        fs::write(dir.path().join("ws.json"), r#"{"2": [4.0], "4": [2.0]}"#).unwrap();

        let report = analyze(&ResultStore::new(dir.path()), &ExecutionMode::ALL).unwrap();
        let charts_dir = dir.path().join("charts/speedup");

        let written = render_report(&report, &charts_dir, "Gravitational RK4 System").unwrap();

        assert_eq!(
            written,
            vec![
                charts_dir.join("parallel.png"),
                charts_dir.join("work_stealing.png")
            ]
        );
        assert!(written.iter().all(|path| is_png(path)));
    }

    #[test]
    fn test_render_custom_size_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("custom.png");
        let chart = SpeedupChart::new("Custom")
            .with_axis_labels("Workers", "Relative speed")
            .with_size(320, 240);

        assert_eq!(chart.x_label, "Workers");
        assert_eq!(chart.y_label, "Relative speed");

        chart.render(&curve(&[(1, 10.0), (8, 2.0)], 10.0), &output).unwrap();
        assert!(is_png(&output));
    }
}
