//! @ai:module:intent Export documents and charts for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ExportFormat, ExportedDocument, Document, CsvExporter, XlsxExporter, ChartGenerator

pub mod charts;
pub mod csv_export;
pub mod document;
pub mod xlsx_export;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use csv_export::CsvExporter;
pub use document::{Cell, Document, Field, RESULT_COLUMNS};
pub use xlsx_export::XlsxExporter;

use crate::error::Result;
use crate::metrics::BenchmarkResult;
use std::path::{Path, PathBuf};

/// @ai:intent Trait for turning a document into file bytes
pub trait DocumentEncoder: Send + Sync {
    /// @ai:intent Encode a document in this container format
    fn encode(&self, document: &Document) -> Result<Vec<u8>>;
}

/// @ai:intent Container format of an exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// @ai:intent File extension for this format
    /// @ai:effects pure
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// @ai:intent MIME type for this format
    /// @ai:effects pure
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unsupported export format: {} (expected csv or xlsx)", other)),
        }
    }
}

/// @ai:intent Encoded export ready to be served or written
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// @ai:intent Write the document into a directory under its own file name
    /// @ai:effects fs:write
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// @ai:intent Download file name derived from the first 8 characters of the run id
/// @ai:effects pure
pub fn export_file_name(run_id: &str, format: ExportFormat) -> String {
    let prefix: String = run_id.chars().take(8).collect();
    format!("{}_benchmark.{}", prefix, format.extension())
}

/// @ai:intent Combined export generator
pub struct ReportGenerator {
    csv: CsvExporter,
    xlsx: XlsxExporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            csv: CsvExporter::new(),
            xlsx: XlsxExporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Build and encode the export document for a result
    /// @ai:effects pure
    pub fn export(&self, result: &BenchmarkResult, format: ExportFormat) -> Result<ExportedDocument> {
        let document = Document::from_result(result);

        let bytes = match format {
            ExportFormat::Csv => self.csv.encode(&document)?,
            ExportFormat::Xlsx => self.xlsx.encode(&document)?,
        };

        tracing::info!(
            "Exported run {} as {} ({} bytes, {} result rows)",
            result.metadata.run_id,
            format.extension(),
            bytes.len(),
            document.rows.len()
        );

        Ok(ExportedDocument {
            file_name: export_file_name(&result.metadata.run_id, format),
            content_type: format.content_type(),
            bytes,
        })
    }

    /// @ai:intent Render charts for a result into a directory
    /// @ai:effects fs:write
    pub fn generate_charts(&self, result: &BenchmarkResult, output_dir: &Path) -> Result<Vec<String>> {
        let generated = self.charts.generate_all(result, output_dir)?;
        tracing::info!("Charts generated in {}", output_dir.display());
        Ok(generated)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
