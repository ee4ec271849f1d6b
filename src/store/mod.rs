//! @ai:module:intent Read access to run records and their results
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunStore, RunQuery, FileRunStore, MemoryRunStore

pub mod file_store;
pub mod memory_store;

pub use file_store::{FileRunStore, StoredRun};
pub use memory_store::MemoryRunStore;

use crate::error::Result;
use crate::metrics::{BenchmarkResult, RunRecord, RunStatus};

/// @ai:intent Paging and filtering for run history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunQuery {
    pub limit: usize,
    pub offset: usize,
    pub status: Option<RunStatus>,
}

impl Default for RunQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            status: None,
        }
    }
}

impl RunQuery {
    /// @ai:intent Apply status filter, newest-first order and paging to a set of runs
    /// @ai:effects pure
    pub fn apply(&self, mut runs: Vec<RunRecord>) -> Vec<RunRecord> {
        if let Some(status) = self.status {
            runs.retain(|r| r.status == status);
        }
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        runs.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

/// @ai:intent Trait for the external store owning run records
pub trait RunStore: Send + Sync {
    /// @ai:intent Look up a run's status record
    fn get_run(&self, run_id: &str) -> Result<Option<RunRecord>>;

    /// @ai:intent Look up a run's result, absent until the run has produced one
    fn get_result(&self, run_id: &str) -> Result<Option<BenchmarkResult>>;

    /// @ai:intent List runs, newest first
    fn list_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn run_record(run_id: &str, status: RunStatus, day: u32) -> RunRecord {
        RunRecord {
            run_id: run_id.to_string(),
            status,
            server_url: "http://localhost:8000".to_string(),
            model: "qwen3-14b".to_string(),
            adapter: "openai".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap(),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_query_orders_newest_first_and_pages() {
        let runs = vec![
            run_record("a", RunStatus::Completed, 1),
            run_record("b", RunStatus::Failed, 3),
            run_record("c", RunStatus::Completed, 2),
        ];

        let all = RunQuery::default().apply(runs.clone());
        let ids: Vec<&str> = all.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let page = RunQuery {
            limit: 1,
            offset: 1,
            status: None,
        }
        .apply(runs.clone());
        assert_eq!(page[0].run_id, "c");

        let completed = RunQuery {
            status: Some(RunStatus::Completed),
            ..RunQuery::default()
        }
        .apply(runs);
        assert_eq!(completed.len(), 2);
    }
}
