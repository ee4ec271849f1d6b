//! @ai:module:intent Measurement and result types for load-test runs
//! @ai:module:layer domain
//! @ai:module:public_api MetricSet, Percentiles, Goodput, Summary, RunRecord, RunStatus, ResultMetadata, BenchmarkResult
//! @ai:module:stateless true

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// @ai:intent Lifecycle state of a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(RunStatus::Pending),
            "running" => Ok(RunStatus::Running),
            "completed" => Ok(RunStatus::Completed),
            "failed" => Ok(RunStatus::Failed),
            other => Err(format!("unknown run status: {}", other)),
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @ai:intent Status record of a run, owned by the run store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(alias = "id")]
    pub run_id: String,
    pub status: RunStatus,
    pub server_url: String,
    pub model: String,
    pub adapter: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// @ai:intent p50/p95/p99 of one latency distribution, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// @ai:intent Share of requests that met the run's goodput policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Goodput {
    #[serde(default)]
    pub satisfied_requests: u64,
    #[serde(default)]
    pub total_requests: u64,
    pub goodput_percent: f64,
}

/// @ai:intent Statistics of one measurement window at a fixed concurrency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub concurrency: u32,
    #[serde(rename = "throughput_tokens_per_sec")]
    pub throughput: f64,
    #[serde(rename = "request_rate_per_sec")]
    pub request_rate: f64,
    pub ttft: Percentiles,
    /// Absent for adapters that do not report inter-token latency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpot: Option<Percentiles>,
    pub e2e_latency: Percentiles,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub error_rate_percent: f64,
    /// Present only when a goodput policy was configured for the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goodput: Option<Goodput>,
}

impl MetricSet {
    /// @ai:intent Check the request-count invariants of a measurement
    /// @ai:effects pure
    pub fn counts_consistent(&self) -> bool {
        self.successful_requests
            .checked_add(self.failed_requests)
            .map_or(false, |sum| sum <= self.total_requests)
    }
}

/// @ai:intent Headline statistics derived from a run's measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub best_throughput: f64,
    pub best_ttft_p50: f64,
    pub best_concurrency: u32,
    pub total_requests: u64,
    pub overall_error_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_goodput_percent: Option<f64>,
}

/// @ai:intent Descriptive fields of a finished run carried with its result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub run_id: String,
    pub server_url: String,
    pub model: String,
    pub adapter: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// @ai:intent Complete result of a run: metadata, per-concurrency measurements, summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    #[serde(flatten)]
    pub metadata: ResultMetadata,
    #[serde(default)]
    pub results: Vec<MetricSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_set_reads_wire_names_and_optional_fields() {
        let json = r#"{
            "concurrency": 4,
            "throughput_tokens_per_sec": 120.5,
            "request_rate_per_sec": 2.25,
            "ttft": {"min": 10.0, "max": 90.0, "mean": 40.0, "p50": 35.0, "p95": 80.0, "p99": 88.0},
            "e2e_latency": {"p50": 900.0, "p95": 1500.0, "p99": 1800.0},
            "total_requests": 100,
            "successful_requests": 99,
            "failed_requests": 1,
            "error_rate_percent": 1.0
        }"#;

        let metrics: MetricSet = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.concurrency, 4);
        assert!((metrics.throughput - 120.5).abs() < f64::EPSILON);
        assert!(metrics.tpot.is_none());
        assert!(metrics.goodput.is_none());
        assert!(metrics.counts_consistent());
    }

    #[test]
    fn test_corrupt_counts_are_inconsistent_not_overflowing() {
        let json = r#"{
            "concurrency": 1,
            "throughput_tokens_per_sec": 1.0,
            "request_rate_per_sec": 1.0,
            "ttft": {"p50": 1.0, "p95": 1.0, "p99": 1.0},
            "e2e_latency": {"p50": 1.0, "p95": 1.0, "p99": 1.0},
            "total_requests": 18446744073709551615,
            "successful_requests": 18446744073709551615,
            "failed_requests": 1,
            "error_rate_percent": 0.0
        }"#;

        let metrics: MetricSet = serde_json::from_str(json).unwrap();
        assert!(!metrics.counts_consistent());
    }

    #[test]
    fn test_run_record_accepts_store_id_alias() {
        let json = r#"{
            "id": "abc",
            "status": "running",
            "server_url": "http://localhost:8000",
            "model": "m",
            "adapter": "openai",
            "created_at": "2026-01-19T00:00:00Z"
        }"#;

        let record: RunRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.run_id, "abc");
        assert_eq!(record.status, RunStatus::Running);
        assert!(record.started_at.is_none());
    }

    #[test]
    fn test_run_status_parses_case_insensitively() {
        assert_eq!("Completed".parse::<RunStatus>().unwrap(), RunStatus::Completed);
        assert!("done".parse::<RunStatus>().is_err());
    }
}
