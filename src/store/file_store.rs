//! @ai:module:intent Run store backed by one JSON document per run
//! @ai:module:layer infrastructure
//! @ai:module:public_api FileRunStore, StoredRun
//! @ai:module:stateless true

use crate::error::{ReportError, Result};
use crate::metrics::{BenchmarkResult, RunRecord};
use crate::store::{RunQuery, RunStore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// @ai:intent On-disk document for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRun {
    pub run: RunRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BenchmarkResult>,
}

fn is_valid_run_id(run_id: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").ok())
        .as_ref()
        .map(|re| re.is_match(run_id))
        .unwrap_or(false)
}

/// @ai:intent Reads `<runs_dir>/<run_id>.json` documents
pub struct FileRunStore {
    runs_dir: PathBuf,
}

impl FileRunStore {
    /// @ai:intent Create a store rooted at a directory
    /// @ai:effects pure
    pub fn new(runs_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs_dir: runs_dir.into(),
        }
    }

    /// @ai:intent Write a run document, replacing any previous one
    /// @ai:pre run_id contains only letters, digits, '-' and '_'
    /// @ai:effects fs:write
    pub fn save(&self, stored: &StoredRun) -> Result<PathBuf> {
        let path = self.run_path(&stored.run.run_id)?;
        std::fs::create_dir_all(&self.runs_dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(stored)?)?;
        Ok(path)
    }

    /// @ai:intent Path of a run document, rejecting ids that could escape the directory
    /// @ai:effects pure
    fn run_path(&self, run_id: &str) -> Result<PathBuf> {
        if !is_valid_run_id(run_id) {
            return Err(ReportError::InvalidRunId(run_id.to_string()));
        }
        Ok(self.runs_dir.join(format!("{}.json", run_id)))
    }

    /// @ai:effects fs:read
    fn read_document(path: &Path) -> Result<StoredRun> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @ai:intent Load a run document if it exists
    /// @ai:effects fs:read
    fn load(&self, run_id: &str) -> Result<Option<StoredRun>> {
        let path = self.run_path(run_id)?;
        if !path.is_file() {
            return Ok(None);
        }
        Self::read_document(&path).map(Some)
    }

    /// @ai:intent Find all run documents directly under the runs directory
    /// @ai:effects fs:read
    fn find_run_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.runs_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    }
}

impl RunStore for FileRunStore {
    /// @ai:effects fs:read
    fn get_run(&self, run_id: &str) -> Result<Option<RunRecord>> {
        Ok(self.load(run_id)?.map(|stored| stored.run))
    }

    /// @ai:effects fs:read
    fn get_result(&self, run_id: &str) -> Result<Option<BenchmarkResult>> {
        Ok(self.load(run_id)?.and_then(|stored| stored.result))
    }

    /// @ai:intent List runs from every readable document
    /// @ai:effects fs:read
    fn list_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>> {
        let mut runs = Vec::new();

        for path in self.find_run_files() {
            match Self::read_document(&path) {
                Ok(stored) => runs.push(stored.run),
                Err(e) => {
                    tracing::warn!("Skipping unreadable run file {}: {}", path.display(), e);
                }
            }
        }

        Ok(query.apply(runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregator::tests::metric_set;
    use crate::metrics::{ResultMetadata, RunStatus};
    use crate::store::tests::run_record;
    use tempfile::TempDir;

    fn stored(run_id: &str, status: RunStatus, day: u32, with_result: bool) -> StoredRun {
        let run = run_record(run_id, status, day);
        let result = with_result.then(|| BenchmarkResult {
            metadata: ResultMetadata {
                run_id: run_id.to_string(),
                server_url: run.server_url.clone(),
                model: run.model.clone(),
                adapter: run.adapter.clone(),
                started_at: None,
                completed_at: None,
                duration_seconds: Some(60.0),
            },
            results: vec![metric_set(1, 50.0, 100.0, 100, 0)],
            summary: None,
        });
        StoredRun { run, result }
    }

    #[test]
    fn test_save_then_lookup() {
        let temp = TempDir::new().unwrap();
        let store = FileRunStore::new(temp.path());
        store.save(&stored("run-1", RunStatus::Completed, 1, true)).unwrap();

        let run = store.get_run("run-1").unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Completed);

        let result = store.get_result("run-1").unwrap().unwrap();
        assert_eq!(result.results.len(), 1);
        assert!(store.get_run("missing").unwrap().is_none());
    }

    #[test]
    fn test_run_without_result() {
        let temp = TempDir::new().unwrap();
        let store = FileRunStore::new(temp.path());
        store.save(&stored("run-2", RunStatus::Running, 1, false)).unwrap();

        assert!(store.get_run("run-2").unwrap().is_some());
        assert!(store.get_result("run-2").unwrap().is_none());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let store = FileRunStore::new(temp.path());

        let err = store.get_run("../etc/passwd").unwrap_err();
        assert!(matches!(err, ReportError::InvalidRunId(_)));
        assert!(store.get_run("").is_err());
    }

    #[test]
    fn test_list_skips_unreadable_files() {
        let temp = TempDir::new().unwrap();
        let store = FileRunStore::new(temp.path());
        store.save(&stored("old", RunStatus::Completed, 1, true)).unwrap();
        store.save(&stored("new", RunStatus::Failed, 5, false)).unwrap();
        std::fs::write(temp.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let runs = store.list_runs(&RunQuery::default()).unwrap();
        let ids: Vec<&str> = runs.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileRunStore::new(temp.path().join("absent"));
        assert!(store.list_runs(&RunQuery::default()).unwrap().is_empty());
    }
}
