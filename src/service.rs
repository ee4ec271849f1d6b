//! @ai:module:intent Caller-facing report operations over an injected run store
//! @ai:module:layer application
//! @ai:module:public_api ReportService, AnalysisOptions, DEFAULT_ANALYSIS_MODEL
//! @ai:module:stateless false

use crate::analysis::{AnalysisClient, AnalysisClientTrait, AnalysisRequest, PromptBuilder, RelayEvent};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::metrics::{BenchmarkResult, ResultAggregator, ResultAggregatorTrait, RunRecord, RunStatus};
use crate::report::{ExportFormat, ExportedDocument, ReportGenerator};
use crate::store::{RunQuery, RunStore};
use futures::stream::BoxStream;
use std::path::Path;
use std::sync::Arc;

/// Model used for analysis when neither the caller, the config nor the run names one.
pub const DEFAULT_ANALYSIS_MODEL: &str = "qwen3-14b";

/// @ai:intent Per-request overrides for an analysis
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub server_url: Option<String>,
    pub model: Option<String>,
}

/// @ai:intent Explicit context holding every collaborator a report operation needs
pub struct ReportService<S: RunStore, C: AnalysisClientTrait = AnalysisClient> {
    store: Arc<S>,
    client: Arc<C>,
    config: ReportConfig,
    aggregator: ResultAggregator,
    generator: ReportGenerator,
    prompts: PromptBuilder,
}

impl<S: RunStore> ReportService<S, AnalysisClient> {
    /// @ai:intent Create a service talking to the configured analysis backend
    /// @ai:effects pure
    pub fn new(store: Arc<S>, config: ReportConfig) -> Result<Self> {
        let client = Arc::new(AnalysisClient::new(config.analysis.clone())?);
        Ok(Self::with_client(store, client, config))
    }
}

impl<S: RunStore, C: AnalysisClientTrait> ReportService<S, C> {
    /// @ai:intent Create a service with an explicit analysis client
    /// @ai:effects pure
    pub fn with_client(store: Arc<S>, client: Arc<C>, config: ReportConfig) -> Self {
        Self {
            store,
            client,
            config,
            aggregator: ResultAggregator::new(),
            generator: ReportGenerator::new(),
            prompts: PromptBuilder::new(),
        }
    }

    /// @ai:intent Active configuration
    /// @ai:effects pure
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// @ai:intent Status record of one run
    /// @ai:effects fs:read
    pub fn run_status(&self, run_id: &str) -> Result<RunRecord> {
        self.store
            .get_run(run_id)?
            .ok_or_else(|| ReportError::NotFound(run_id.to_string()))
    }

    /// @ai:intent Run history, newest first
    /// @ai:effects fs:read
    pub fn list_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>> {
        self.store.list_runs(query)
    }

    /// @ai:intent Result of a run with its summary filled in
    /// @ai:post summary is present whenever the result has measurements
    /// @ai:effects fs:read
    pub fn result(&self, run_id: &str) -> Result<BenchmarkResult> {
        let Some(mut result) = self.store.get_result(run_id)? else {
            return Err(self.missing_result(run_id)?);
        };

        if result.summary.is_none() {
            result.summary = self.aggregator.aggregate(&result.results);
            if result.summary.is_some() {
                tracing::info!(
                    "Computed summary for run {} from {} measurements",
                    run_id,
                    result.results.len()
                );
            }
        }

        Ok(result)
    }

    /// @ai:intent Explain why a run has no result
    /// @ai:effects fs:read
    fn missing_result(&self, run_id: &str) -> Result<ReportError> {
        let id = run_id.to_string();
        let err = match self.store.get_run(run_id)? {
            None => ReportError::NotFound(id),
            Some(run) => match run.status {
                RunStatus::Pending | RunStatus::Running => ReportError::NotReady(id),
                RunStatus::Failed => ReportError::RunFailed(id),
                RunStatus::Completed => ReportError::ResultNotFound(id),
            },
        };
        Ok(err)
    }

    /// @ai:intent Export a run's result as a downloadable document
    /// @ai:effects fs:read
    pub fn export(&self, run_id: &str, format: ExportFormat) -> Result<ExportedDocument> {
        let result = self.result(run_id)?;
        self.generator.export(&result, format)
    }

    /// @ai:intent Render throughput and latency charts for a run
    /// @ai:effects fs:read, fs:write
    pub fn generate_charts(&self, run_id: &str, output_dir: &Path) -> Result<Vec<String>> {
        let result = self.result(run_id)?;
        self.generator.generate_charts(&result, output_dir)
    }

    /// @ai:intent Analysis prompt for a run
    /// @ai:effects fs:read
    pub fn analysis_prompt(&self, run_id: &str) -> Result<String> {
        let result = self.result(run_id)?;
        Ok(self.prompts.build(&result))
    }

    /// @ai:intent Start a streamed analysis of a run
    /// @ai:pre lookup failures are returned before any event is produced
    /// @ai:post the stream ends with exactly one terminal event
    /// @ai:effects fs:read, network
    pub fn analyze(&self, run_id: &str, options: AnalysisOptions) -> Result<BoxStream<'static, RelayEvent>> {
        let result = self.result(run_id)?;
        let request = self.analysis_request(&result, options);

        tracing::info!("Starting analysis of run {} with model {}", run_id, request.model);
        Ok(self.client.stream_analysis(request))
    }

    /// @ai:intent Resolve backend and model for an analysis
    /// @ai:effects pure
    fn analysis_request(&self, result: &BenchmarkResult, options: AnalysisOptions) -> AnalysisRequest {
        let server_url = options
            .server_url
            .unwrap_or_else(|| self.config.analysis.server_url.clone());

        let run_model = Some(result.metadata.model.clone()).filter(|m| !m.is_empty());
        let model = options
            .model
            .or_else(|| self.config.analysis.model.clone())
            .or(run_model)
            .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string());

        AnalysisRequest {
            server_url,
            model,
            prompt: self.prompts.build(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockAnalysisClient;
    use crate::metrics::aggregator::tests::metric_set;
    use crate::metrics::ResultMetadata;
    use crate::store::tests::run_record;
    use crate::store::MemoryRunStore;
    use futures::StreamExt;

    fn result_for(run_id: &str) -> BenchmarkResult {
        BenchmarkResult {
            metadata: ResultMetadata {
                run_id: run_id.to_string(),
                server_url: "http://localhost:8000".to_string(),
                model: "llama-3-8b".to_string(),
                adapter: "openai".to_string(),
                started_at: None,
                completed_at: None,
                duration_seconds: Some(30.0),
            },
            results: vec![
                metric_set(1, 50.0, 100.0, 100, 0),
                metric_set(4, 180.0, 140.0, 400, 2),
            ],
            summary: None,
        }
    }

    fn service(deltas: &[&str]) -> ReportService<MemoryRunStore, MockAnalysisClient> {
        let store = MemoryRunStore::new();
        store.insert(run_record("done", RunStatus::Completed, 1), Some(result_for("done")));
        store.insert(run_record("busy", RunStatus::Running, 2), None);
        store.insert(run_record("queued", RunStatus::Pending, 2), None);
        store.insert(run_record("broken", RunStatus::Failed, 3), None);
        store.insert(run_record("lost", RunStatus::Completed, 4), None);

        ReportService::with_client(
            Arc::new(store),
            Arc::new(MockAnalysisClient::with_deltas(deltas)),
            ReportConfig::default(),
        )
    }

    #[test]
    fn test_result_fills_missing_summary() {
        let result = service(&[]).result("done").unwrap();
        let summary = result.summary.unwrap();
        assert_eq!(summary.best_concurrency, 4);
        assert_eq!(summary.total_requests, 500);
    }

    #[test]
    fn test_lookup_failures_map_to_run_state() {
        let svc = service(&[]);

        assert!(matches!(svc.result("nope"), Err(ReportError::NotFound(_))));
        assert!(matches!(svc.result("busy"), Err(ReportError::NotReady(_))));
        assert!(matches!(svc.result("queued"), Err(ReportError::NotReady(_))));
        assert!(matches!(svc.result("broken"), Err(ReportError::RunFailed(_))));
        assert!(matches!(svc.result("lost"), Err(ReportError::ResultNotFound(_))));
        assert!(matches!(svc.run_status("nope"), Err(ReportError::NotFound(_))));
    }

    #[test]
    fn test_export_names_file_after_run() {
        let exported = service(&[]).export("done", ExportFormat::Csv).unwrap();
        assert_eq!(exported.file_name, "done_benchmark.csv");
        assert_eq!(exported.content_type, "text/csv");
    }

    #[test]
    fn test_export_of_running_run_fails_before_encoding() {
        let err = service(&[]).export("busy", ExportFormat::Csv).unwrap_err();
        assert_eq!(err.status_code(), 202);
    }

    #[test]
    fn test_model_resolution_order() {
        let svc = service(&[]);
        let result = result_for("done");

        let request = svc.analysis_request(&result, AnalysisOptions::default());
        assert_eq!(request.model, "llama-3-8b");
        assert_eq!(request.server_url, "http://host.docker.internal:8000");

        let request = svc.analysis_request(
            &result,
            AnalysisOptions {
                server_url: Some("http://gpu:9000".to_string()),
                model: Some("qwen3-32b".to_string()),
            },
        );
        assert_eq!(request.model, "qwen3-32b");
        assert_eq!(request.server_url, "http://gpu:9000");

        let mut unnamed = result_for("done");
        unnamed.metadata.model.clear();
        let request = svc.analysis_request(&unnamed, AnalysisOptions::default());
        assert_eq!(request.model, DEFAULT_ANALYSIS_MODEL);
    }

    #[tokio::test]
    async fn test_analyze_streams_filtered_report() {
        let svc = service(&["Let me think.\n", "# Analysis\n", "Looks good."]);

        let events: Vec<RelayEvent> = svc
            .analyze("done", AnalysisOptions::default())
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                RelayEvent::Content("# Analysis\n".to_string()),
                RelayEvent::Content("Looks good.".to_string()),
                RelayEvent::Done,
            ]
        );
    }

    #[test]
    fn test_analyze_checks_run_before_streaming() {
        let svc = service(&["# never"]);
        assert!(matches!(
            svc.analyze("broken", AnalysisOptions::default()),
            Err(ReportError::RunFailed(_))
        ));
    }
}
