//! @ai:module:intent Roll per-concurrency measurements into a run summary
//! @ai:module:layer application
//! @ai:module:public_api ResultAggregator, ResultAggregatorTrait
//! @ai:module:stateless true

use crate::metrics::types::{MetricSet, Summary};

/// @ai:intent Trait for result aggregation
pub trait ResultAggregatorTrait: Send + Sync {
    /// @ai:intent Compute the summary of a run, None when there are no measurements
    fn aggregate(&self, metrics: &[MetricSet]) -> Option<Summary>;
}

/// @ai:intent Aggregates measurement windows into headline statistics
pub struct ResultAggregator;

impl ResultAggregator {
    /// @ai:intent Create a new result aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Pick the measurement with the highest throughput
    /// @ai:post ties resolve to the earliest element in input order
    /// @ai:effects pure
    fn best_by_throughput(metrics: &[MetricSet]) -> Option<&MetricSet> {
        // Strict comparison keeps the first of several equal maxima. Callers should
        // not read meaning into which concurrency wins a tie.
        metrics.iter().fold(None, |best: Option<&MetricSet>, m| match best {
            Some(b) if m.throughput <= b.throughput => Some(b),
            _ => Some(m),
        })
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Calculate average of an iterator of f64, None when empty
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> Option<f64> {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl ResultAggregatorTrait for ResultAggregator {
    /// @ai:intent Aggregate measurements into a summary
    /// @ai:effects pure
    fn aggregate(&self, metrics: &[MetricSet]) -> Option<Summary> {
        let best = Self::best_by_throughput(metrics)?;

        for m in metrics.iter().filter(|m| !m.counts_consistent()) {
            tracing::warn!(
                "Inconsistent request counts at concurrency {}: {} ok + {} failed > {} total",
                m.concurrency,
                m.successful_requests,
                m.failed_requests,
                m.total_requests
            );
        }

        let best_ttft_p50 = metrics
            .iter()
            .map(|m| m.ttft.p50)
            .fold(f64::INFINITY, f64::min);

        let total_requests: u64 = metrics.iter().map(|m| m.total_requests).sum();
        let failed_requests: u64 = metrics.iter().map(|m| m.failed_requests).sum();

        let overall_error_rate = if total_requests > 0 {
            failed_requests as f64 / total_requests as f64 * 100.0
        } else {
            0.0
        };

        let avg_goodput_percent =
            average(metrics.iter().filter_map(|m| m.goodput).map(|g| g.goodput_percent));

        tracing::debug!(
            "Aggregated {} measurements: best throughput {:.2} at concurrency {}",
            metrics.len(),
            best.throughput,
            best.concurrency
        );

        Some(Summary {
            best_throughput: best.throughput,
            best_ttft_p50,
            best_concurrency: best.concurrency,
            total_requests,
            overall_error_rate,
            avg_goodput_percent,
        })
    }
}
