//! @ai:module:intent Load-test result reporting: aggregation, export and streamed analysis
//! @ai:module:layer application
//! @ai:module:public_api config, error, metrics, report, analysis, store, service

pub mod analysis;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod service;
pub mod store;

pub use analysis::{AnalysisClient, PromptBuilder, RelayEvent, ThinkFilter};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use metrics::{BenchmarkResult, MetricSet, ResultAggregator, Summary};
pub use report::{ExportFormat, ExportedDocument, ReportGenerator};
pub use service::{AnalysisOptions, ReportService};
pub use store::{FileRunStore, MemoryRunStore, RunQuery, RunStore};
