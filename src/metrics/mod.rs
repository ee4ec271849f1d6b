//! @ai:module:intent Measurement model and summary aggregation
//! @ai:module:layer domain
//! @ai:module:public_api MetricSet, Summary, BenchmarkResult, RunRecord, ResultAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{ResultAggregator, ResultAggregatorTrait};
pub use types::{
    BenchmarkResult, Goodput, MetricSet, Percentiles, ResultMetadata, RunRecord, RunStatus,
    Summary,
};
