//! @ai:module:intent CSV encoding of an export document
//! @ai:module:layer infrastructure
//! @ai:module:public_api CsvExporter
//! @ai:module:stateless true

use crate::error::Result;
use crate::report::document::{Document, Field, DOCUMENT_TITLE, SUMMARY_TITLE, TABLE_TITLE};
use crate::report::DocumentEncoder;

/// @ai:intent Writes documents as CSV text with CRLF row terminators
pub struct CsvExporter;

impl CsvExporter {
    /// @ai:intent Create a new CSV exporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render a document as CSV text
    /// @ai:effects pure
    pub fn render(&self, document: &Document) -> String {
        let mut out = String::new();

        write_row(&mut out, &[format!("# {}", DOCUMENT_TITLE)]);
        write_fields(&mut out, &document.metadata);
        write_row(&mut out, &[]);

        write_row(&mut out, &[format!("# {}", SUMMARY_TITLE)]);
        write_fields(&mut out, &document.summary);
        write_row(&mut out, &[]);

        write_row(&mut out, &[format!("# {}", TABLE_TITLE)]);
        let header: Vec<String> = document.columns().iter().map(|c| c.to_string()).collect();
        write_row(&mut out, &header);

        for row in &document.rows {
            let fields: Vec<String> = row.iter().map(|cell| cell.csv_text()).collect();
            write_row(&mut out, &fields);
        }

        out
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEncoder for CsvExporter {
    /// @ai:intent Encode a document as UTF-8 CSV bytes
    /// @ai:effects pure
    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(self.render(document).into_bytes())
    }
}

fn write_fields(out: &mut String, fields: &[Field]) {
    for field in fields {
        write_row(out, &[field.label.to_string(), field.value.csv_text()]);
    }
}

fn write_row(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
    out.push_str(&escaped.join(","));
    out.push_str("\r\n");
}

/// @ai:intent Quote a field only when it contains a delimiter, quote or line break
/// @ai:effects pure
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
