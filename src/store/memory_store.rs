//! @ai:module:intent In-memory run store for embedding and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api MemoryRunStore
//! @ai:module:stateless false

use crate::error::Result;
use crate::metrics::{BenchmarkResult, RunRecord};
use crate::store::{RunQuery, RunStore, StoredRun};
use std::collections::HashMap;
use std::sync::RwLock;

/// @ai:intent Run documents held in a map keyed by run id
#[derive(Default)]
pub struct MemoryRunStore {
    runs: RwLock<HashMap<String, StoredRun>>,
}

impl MemoryRunStore {
    /// @ai:intent Create an empty store
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Insert or replace a run and its optional result
    /// @ai:effects state:write
    pub fn insert(&self, run: RunRecord, result: Option<BenchmarkResult>) {
        let mut runs = self.runs.write().unwrap_or_else(|e| e.into_inner());
        runs.insert(run.run_id.clone(), StoredRun { run, result });
    }

    fn read<T>(&self, f: impl FnOnce(&HashMap<String, StoredRun>) -> T) -> T {
        let runs = self.runs.read().unwrap_or_else(|e| e.into_inner());
        f(&runs)
    }
}

impl RunStore for MemoryRunStore {
    fn get_run(&self, run_id: &str) -> Result<Option<RunRecord>> {
        Ok(self.read(|runs| runs.get(run_id).map(|s| s.run.clone())))
    }

    fn get_result(&self, run_id: &str) -> Result<Option<BenchmarkResult>> {
        Ok(self.read(|runs| runs.get(run_id).and_then(|s| s.result.clone())))
    }

    fn list_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>> {
        let runs = self.read(|runs| runs.values().map(|s| s.run.clone()).collect());
        Ok(query.apply(runs))
    }
}
