//! @ai:module:intent Configuration structs for the report service
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportConfig, AnalysisConfig, StoreConfig, ExportConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// @ai:intent Main configuration for the report service
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// @ai:intent Upstream text-generation endpoint used for analysis
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Overrides the run's own model when set
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Longest wait for a single upstream fragment
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// @ai:intent Location of stored run records
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_runs_dir")]
    pub runs_dir: PathBuf,
}

/// @ai:intent Where exported documents and charts are written
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            runs_dir: default_runs_dir(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_server_url() -> String {
    "http://host.docker.internal:8000".to_string()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.3
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    300
}

fn default_system_prompt() -> String {
    "You are an expert in LLM serving performance. Analyze the benchmark results \
     and write the report in markdown format."
        .to_string()
}

fn default_runs_dir() -> PathBuf {
    PathBuf::from("runs")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

impl AnalysisConfig {
    /// @ai:intent Connect timeout as a Duration
    /// @ai:effects pure
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// @ai:intent Per-fragment read timeout as a Duration
    /// @ai:effects pure
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl ReportConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_analysis_backend_conventions() {
        let config = ReportConfig::default();
        assert_eq!(config.analysis.max_tokens, 8192);
        assert!((config.analysis.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.analysis.read_timeout(), Duration::from_secs(300));
        assert!(config.analysis.model.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ReportConfig = toml::from_str(
            r#"
            [analysis]
            server_url = "http://localhost:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.server_url, "http://localhost:9000");
        assert_eq!(config.analysis.max_tokens, 8192);
        assert_eq!(config.store.runs_dir, PathBuf::from("runs"));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.toml");

        let mut config = ReportConfig::default();
        config.analysis.model = Some("qwen3-32b".to_string());
        config.save(&path).unwrap();

        let loaded = ReportConfig::load(&path).unwrap();
        assert_eq!(loaded.analysis.model.as_deref(), Some("qwen3-32b"));
        assert_eq!(loaded.export.output_dir, PathBuf::from("exports"));
    }
}
