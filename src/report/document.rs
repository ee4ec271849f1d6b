//! @ai:module:intent Encoding-independent layout of an exported run result
//! @ai:module:layer domain
//! @ai:module:public_api Document, Field, Cell, RESULT_COLUMNS
//! @ai:module:stateless true

use crate::metrics::{BenchmarkResult, MetricSet, Percentiles, Summary};
use chrono::{DateTime, SecondsFormat, Utc};

/// Column names of the results table, in order.
pub const RESULT_COLUMNS: [&str; 17] = [
    "Concurrency",
    "Throughput (tok/s)",
    "Request Rate (req/s)",
    "TTFT p50 (ms)",
    "TTFT p95 (ms)",
    "TTFT p99 (ms)",
    "TPOT p50 (ms)",
    "TPOT p95 (ms)",
    "TPOT p99 (ms)",
    "E2E p50 (ms)",
    "E2E p95 (ms)",
    "E2E p99 (ms)",
    "Total Requests",
    "Successful",
    "Failed",
    "Error Rate (%)",
    "Goodput (%)",
];

pub const DOCUMENT_TITLE: &str = "Benchmark Result Export";
pub const SUMMARY_TITLE: &str = "Summary";
pub const TABLE_TITLE: &str = "Detailed Results by Concurrency";

/// @ai:intent One typed value of the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(u64),
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// @ai:intent Text form used by the CSV encoding
    /// @ai:effects pure
    pub fn csv_text(&self) -> String {
        match self {
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => format!("{:.2}", v),
            Cell::Text(s) => s.clone(),
            Cell::Missing => "N/A".to_string(),
        }
    }

    /// @ai:intent Numeric value rounded to two decimals, None for text or missing
    /// @ai:effects pure
    pub fn rounded_number(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(round2(*v)),
            Cell::Text(_) | Cell::Missing => None,
        }
    }
}

/// @ai:intent Round to two decimals through the same text the CSV encoding writes
/// @ai:post round2(v) parses back from format!("{:.2}", v)
/// @ai:effects pure
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// @ai:intent Labelled value in the metadata or summary block
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: Cell,
}

impl Field {
    fn new(label: &'static str, value: Cell) -> Self {
        Self { label, value }
    }
}

/// @ai:intent Three-section export artifact: metadata, summary, results table
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Vec<Field>,
    pub summary: Vec<Field>,
    pub rows: Vec<Vec<Cell>>,
}

impl Document {
    /// @ai:intent Lay out a run result for export
    /// @ai:post rows.len() == result.results.len(), in input order
    /// @ai:effects pure
    pub fn from_result(result: &BenchmarkResult) -> Self {
        let meta = &result.metadata;

        let metadata = vec![
            Field::new("Run ID", Cell::Text(meta.run_id.clone())),
            Field::new("Model", Cell::Text(meta.model.clone())),
            Field::new("Server URL", Cell::Text(meta.server_url.clone())),
            Field::new("Adapter", Cell::Text(meta.adapter.clone())),
            Field::new("Started At", timestamp_cell(meta.started_at)),
            Field::new("Completed At", timestamp_cell(meta.completed_at)),
            Field::new(
                "Duration (s)",
                meta.duration_seconds.map(Cell::Float).unwrap_or(Cell::Missing),
            ),
        ];

        Self {
            metadata,
            summary: summary_fields(result.summary.as_ref()),
            rows: result.results.iter().map(result_row).collect(),
        }
    }

    /// @ai:intent Column names of the results table
    /// @ai:effects pure
    pub fn columns(&self) -> &'static [&'static str; 17] {
        &RESULT_COLUMNS
    }
}

fn timestamp_cell(ts: Option<DateTime<Utc>>) -> Cell {
    ts.map(|t| Cell::Text(t.to_rfc3339_opts(SecondsFormat::Secs, true)))
        .unwrap_or(Cell::Missing)
}

fn summary_fields(summary: Option<&Summary>) -> Vec<Field> {
    let Some(s) = summary else {
        return [
            "Best Throughput (tok/s)",
            "Best TTFT p50 (ms)",
            "Best Concurrency",
            "Total Requests",
            "Overall Error Rate (%)",
        ]
        .into_iter()
        .map(|label| Field::new(label, Cell::Missing))
        .collect();
    };

    let mut fields = vec![
        Field::new("Best Throughput (tok/s)", Cell::Float(s.best_throughput)),
        Field::new("Best TTFT p50 (ms)", Cell::Float(s.best_ttft_p50)),
        Field::new("Best Concurrency", Cell::Int(u64::from(s.best_concurrency))),
        Field::new("Total Requests", Cell::Int(s.total_requests)),
        Field::new("Overall Error Rate (%)", Cell::Float(s.overall_error_rate)),
    ];

    if let Some(goodput) = s.avg_goodput_percent {
        fields.push(Field::new("Avg Goodput (%)", Cell::Float(goodput)));
    }

    fields
}

fn percentile_cells(p: Option<&Percentiles>) -> [Cell; 3] {
    match p {
        Some(p) => [Cell::Float(p.p50), Cell::Float(p.p95), Cell::Float(p.p99)],
        None => [Cell::Missing, Cell::Missing, Cell::Missing],
    }
}

fn result_row(m: &MetricSet) -> Vec<Cell> {
    let mut row = Vec::with_capacity(RESULT_COLUMNS.len());

    row.push(Cell::Int(u64::from(m.concurrency)));
    row.push(Cell::Float(m.throughput));
    row.push(Cell::Float(m.request_rate));
    row.extend(percentile_cells(Some(&m.ttft)));
    row.extend(percentile_cells(m.tpot.as_ref()));
    row.extend(percentile_cells(Some(&m.e2e_latency)));
    row.push(Cell::Int(m.total_requests));
    row.push(Cell::Int(m.successful_requests));
    row.push(Cell::Int(m.failed_requests));
    row.push(Cell::Float(m.error_rate_percent));
    row.push(
        m.goodput
            .map(|g| Cell::Float(g.goodput_percent))
            .unwrap_or(Cell::Missing),
    );

    row
}
