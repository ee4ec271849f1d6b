//! @ai:module:intent Define error types for report, export and analysis operations
//! @ai:module:layer domain
//! @ai:module:public_api ReportError, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for all report operations
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Run not found: {0}")]
    NotFound(String),

    #[error("Result not found for run {0}")]
    ResultNotFound(String),

    #[error("Benchmark still running: {0}")]
    NotReady(String),

    #[error("Benchmark failed: {0}")]
    RunFailed(String),

    #[error("Spreadsheet export not available in this build (enable the `xlsx` feature)")]
    ExportBackendUnavailable,

    #[error("Cannot connect to analysis server: {url}")]
    UpstreamConnect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed upstream fragment: {0}")]
    UpstreamProtocol(String),

    #[error("{0}")]
    RelayFailure(String),

    #[error("Invalid run id: {0:?}")]
    InvalidRunId(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet encoding failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl ReportError {
    /// @ai:intent HTTP status an outer web layer would answer with
    /// @ai:effects pure
    pub fn status_code(&self) -> u16 {
        match self {
            ReportError::NotFound(_) | ReportError::ResultNotFound(_) => 404,
            ReportError::NotReady(_) => 202,
            ReportError::InvalidRunId(_) => 400,
            ReportError::UpstreamConnect { .. } => 502,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
