//! @ai:module:intent Single-sheet spreadsheet encoding of an export document
//! @ai:module:layer infrastructure
//! @ai:module:public_api XlsxExporter, SheetCell, SheetValue
//! @ai:module:stateless true

use crate::error::Result;
use crate::report::document::{Cell, Document, Field, DOCUMENT_TITLE, SUMMARY_TITLE, TABLE_TITLE};
use crate::report::DocumentEncoder;

pub const SHEET_NAME: &str = "Benchmark Results";
pub const COLUMN_WIDTH: f64 = 12.0;
const HEADER_FILL: u32 = 0x4472C4;

/// @ai:intent Visual role of a placed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStyle {
    Plain,
    DocumentTitle,
    SectionTitle,
    Label,
    TableHeader,
}

/// @ai:intent Typed value written to a sheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue {
    Number(f64),
    Text(String),
}

/// @ai:intent One cell placed on the sheet (zero-based row and column)
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub row: u32,
    pub col: u16,
    pub value: SheetValue,
    pub style: SheetStyle,
}

/// @ai:intent Writes documents as a single-sheet workbook
pub struct XlsxExporter;

impl XlsxExporter {
    /// @ai:intent Create a new spreadsheet exporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Place every document value on the sheet grid
    /// @ai:post table cells hold numbers rounded to two decimals, missing table cells are skipped
    /// @ai:effects pure
    pub fn layout(&self, document: &Document) -> Vec<SheetCell> {
        let mut cells = Vec::new();
        let mut row = 0u32;

        cells.push(text_cell(row, 0, DOCUMENT_TITLE, SheetStyle::DocumentTitle));
        row += 2;

        row = place_fields(&mut cells, row, &document.metadata);
        row += 1;

        cells.push(text_cell(row, 0, SUMMARY_TITLE, SheetStyle::SectionTitle));
        row += 1;

        row = place_fields(&mut cells, row, &document.summary);
        row += 2;

        cells.push(text_cell(row, 0, TABLE_TITLE, SheetStyle::SectionTitle));
        row += 1;

        for (col, name) in document.columns().iter().enumerate() {
            cells.push(text_cell(row, col as u16, name, SheetStyle::TableHeader));
        }
        row += 1;

        for values in &document.rows {
            for (col, cell) in values.iter().enumerate() {
                if let Some(value) = table_value(cell) {
                    cells.push(SheetCell {
                        row,
                        col: col as u16,
                        value,
                        style: SheetStyle::Plain,
                    });
                }
            }
            row += 1;
        }

        cells
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn text_cell(row: u32, col: u16, text: &str, style: SheetStyle) -> SheetCell {
    SheetCell {
        row,
        col,
        value: SheetValue::Text(text.to_string()),
        style,
    }
}

fn place_fields(cells: &mut Vec<SheetCell>, mut row: u32, fields: &[Field]) -> u32 {
    for field in fields {
        cells.push(text_cell(row, 0, field.label, SheetStyle::Label));
        let value = match &field.value {
            Cell::Text(s) => SheetValue::Text(s.clone()),
            Cell::Missing => SheetValue::Text("N/A".to_string()),
            other => SheetValue::Number(other.rounded_number().unwrap_or_default()),
        };
        cells.push(SheetCell {
            row,
            col: 1,
            value,
            style: SheetStyle::Plain,
        });
        row += 1;
    }
    row
}

fn table_value(cell: &Cell) -> Option<SheetValue> {
    match cell {
        Cell::Missing => None,
        Cell::Text(s) => Some(SheetValue::Text(s.clone())),
        other => other.rounded_number().map(SheetValue::Number),
    }
}

#[cfg(feature = "xlsx")]
impl DocumentEncoder for XlsxExporter {
    /// @ai:intent Encode a document as an xlsx workbook
    /// @ai:effects pure
    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

        let plain = Format::new();
        let title = Format::new().set_bold().set_font_size(14);
        let section = Format::new().set_bold().set_font_size(12);
        let label = Format::new().set_bold();
        let header = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_align(FormatAlign::Center);

        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SHEET_NAME)?;

            for cell in self.layout(document) {
                let format = match cell.style {
                    SheetStyle::Plain => &plain,
                    SheetStyle::DocumentTitle => &title,
                    SheetStyle::SectionTitle => &section,
                    SheetStyle::Label => &label,
                    SheetStyle::TableHeader => &header,
                };

                match &cell.value {
                    SheetValue::Number(n) => {
                        sheet.write_number_with_format(cell.row, cell.col, *n, format)?;
                    }
                    SheetValue::Text(s) => {
                        sheet.write_string_with_format(cell.row, cell.col, s, format)?;
                    }
                }
            }

            for col in 0..document.columns().len() as u16 {
                sheet.set_column_width(col, COLUMN_WIDTH)?;
            }
        }

        let bytes = workbook.save_to_buffer()?;
        tracing::debug!("Encoded spreadsheet with {} result rows", document.rows.len());
        Ok(bytes)
    }
}

#[cfg(not(feature = "xlsx"))]
impl DocumentEncoder for XlsxExporter {
    fn encode(&self, _document: &Document) -> Result<Vec<u8>> {
        Err(crate::error::ReportError::ExportBackendUnavailable)
    }
}
