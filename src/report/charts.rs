//! @ai:module:intent Chart generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::error::{ReportError, Result};
use crate::metrics::{BenchmarkResult, MetricSet};
use plotters::prelude::*;
use std::path::Path;

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from a result
    fn generate_all(&self, result: &BenchmarkResult, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates concurrency charts from benchmark results
pub struct ChartGenerator {
    labels: bool,
}

impl ChartGenerator {
    /// @ai:intent Create a chart generator with captions, axis labels and legends
    /// @ai:effects pure
    pub fn new() -> Self {
        Self { labels: true }
    }

    /// @ai:intent Create a generator that draws lines and points only
    /// @ai:post rendering needs no system fonts
    /// @ai:effects pure
    pub fn without_labels() -> Self {
        Self { labels: false }
    }

    /// @ai:intent Generate throughput by concurrency line chart
    /// @ai:effects fs:write
    fn generate_throughput_chart(&self, metrics: &[MetricSet], output_path: &Path) -> DrawResult {
        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = axis_max(metrics.iter().map(|m| m.throughput));

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if self.labels {
            builder
                .caption("Throughput by Concurrency", ("sans-serif", 25))
                .x_label_area_size(40)
                .y_label_area_size(60);
        }
        let mut chart = builder.build_cartesian_2d(0..metrics.len() as i32, 0f64..y_max)?;

        if self.labels {
            chart
                .configure_mesh()
                .x_labels(metrics.len())
                .y_desc("Throughput (tok/s)")
                .x_desc("Concurrency")
                .x_label_formatter(&|x| concurrency_label(metrics, *x))
                .draw()?;
        }

        chart.draw_series(LineSeries::new(
            metrics.iter().enumerate().map(|(i, m)| (i as i32, m.throughput)),
            &BLUE,
        ))?;
        chart.draw_series(
            metrics
                .iter()
                .enumerate()
                .map(|(i, m)| Circle::new((i as i32, m.throughput), 4, BLUE.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Generate latency percentiles by concurrency line chart
    /// @ai:effects fs:write
    fn generate_latency_chart(&self, metrics: &[MetricSet], output_path: &Path) -> DrawResult {
        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = axis_max(
            metrics
                .iter()
                .flat_map(|m| [m.ttft.p50, m.ttft.p99, m.e2e_latency.p50]),
        );

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if self.labels {
            builder
                .caption("Latency by Concurrency", ("sans-serif", 25))
                .x_label_area_size(40)
                .y_label_area_size(60);
        }
        let mut chart = builder.build_cartesian_2d(0..metrics.len() as i32, 0f64..y_max)?;

        if self.labels {
            chart
                .configure_mesh()
                .x_labels(metrics.len())
                .y_desc("Latency (ms)")
                .x_desc("Concurrency")
                .x_label_formatter(&|x| concurrency_label(metrics, *x))
                .draw()?;
        }

        let series: [(&str, RGBColor, fn(&MetricSet) -> f64); 3] = [
            ("TTFT p50", BLUE, |m| m.ttft.p50),
            ("TTFT p99", RED, |m| m.ttft.p99),
            ("E2E p50", GREEN, |m| m.e2e_latency.p50),
        ];

        for (name, color, value) in series {
            chart
                .draw_series(LineSeries::new(
                    metrics.iter().enumerate().map(|(i, m)| (i as i32, value(m))),
                    &color,
                ))?
                .label(name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        if self.labels {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn axis_max<I: Iterator<Item = f64>>(values: I) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn concurrency_label(metrics: &[MetricSet], x: i32) -> String {
    usize::try_from(x)
        .ok()
        .and_then(|i| metrics.get(i))
        .map(|m| m.concurrency.to_string())
        .unwrap_or_default()
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts, none when the result has no measurements
    /// @ai:effects fs:write
    fn generate_all(&self, result: &BenchmarkResult, output_dir: &Path) -> Result<Vec<String>> {
        if result.results.is_empty() {
            tracing::warn!("Run {} has no measurements, skipping charts", result.metadata.run_id);
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        let throughput_path = output_dir.join("throughput.png");
        self.generate_throughput_chart(&result.results, &throughput_path)
            .map_err(|e| ReportError::Chart(e.to_string()))?;
        generated.push("throughput.png".to_string());

        let latency_path = output_dir.join("latency.png");
        self.generate_latency_chart(&result.results, &latency_path)
            .map_err(|e| ReportError::Chart(e.to_string()))?;
        generated.push("latency.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregator::tests::metric_set;
    use crate::metrics::ResultMetadata;
    use tempfile::TempDir;

    fn create_test_result(results: Vec<MetricSet>) -> BenchmarkResult {
        BenchmarkResult {
            metadata: ResultMetadata {
                run_id: "chart-run".to_string(),
                server_url: "http://localhost:8000".to_string(),
                model: "test-model".to_string(),
                adapter: "openai".to_string(),
                started_at: None,
                completed_at: None,
                duration_seconds: None,
            },
            results,
            summary: None,
        }
    }

    #[test]
    fn test_axis_max_pads_and_handles_zero() {
        assert!((axis_max([10.0, 20.0].into_iter()) - 22.0).abs() < 1e-9);
        assert_eq!(axis_max(std::iter::empty()), 1.0);
    }

    #[test]
    fn test_concurrency_label_out_of_range_is_blank() {
        let metrics = vec![metric_set(4, 1.0, 1.0, 1, 0)];
        assert_eq!(concurrency_label(&metrics, 0), "4");
        assert_eq!(concurrency_label(&metrics, 3), "");
        assert_eq!(concurrency_label(&metrics, -1), "");
    }

    #[test]
    fn test_no_measurements_no_charts() {
        let temp = TempDir::new().unwrap();
        let files = ChartGenerator::new()
            .generate_all(&create_test_result(vec![]), temp.path())
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_generate_unlabelled_charts() {
        let temp = TempDir::new().unwrap();
        let result = create_test_result(vec![
            metric_set(1, 50.0, 100.0, 100, 0),
            metric_set(4, 180.0, 140.0, 400, 2),
            metric_set(8, 300.0, 250.0, 800, 8),
        ]);

        let files = ChartGenerator::without_labels()
            .generate_all(&result, temp.path())
            .unwrap();

        assert_eq!(files, vec!["throughput.png".to_string(), "latency.png".to_string()]);
        for file in &files {
            let bytes = std::fs::read(temp.path().join(file)).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", file);
        }
    }

    #[test]
    fn test_single_measurement_chart() {
        let temp = TempDir::new().unwrap();
        let result = create_test_result(vec![metric_set(2, 0.0, 0.0, 0, 0)]);

        let files = ChartGenerator::without_labels()
            .generate_all(&result, temp.path())
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    #[ignore = "needs system fonts for axis labels"]
    fn test_generate_all_charts() {
        let temp = TempDir::new().unwrap();
        let result = create_test_result(vec![
            metric_set(1, 50.0, 100.0, 100, 0),
            metric_set(4, 180.0, 140.0, 400, 2),
            metric_set(8, 300.0, 250.0, 800, 8),
        ]);

        let files = ChartGenerator::new().generate_all(&result, temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(temp.path().join("throughput.png").exists());
        assert!(temp.path().join("latency.png").exists());
    }
}
