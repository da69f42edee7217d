use serde::{Deserialize, Serialize};

use crate::cell::{CellValue, HeaderRow, Row};

/// Raw contents of a tabular data source: one header row and the data rows below it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetData {
    pub source_id: String,
    pub title: String,
    pub header_row: HeaderRow,
    pub rows: Vec<Row>,
}

impl SheetData {
    pub fn new(source_id: impl Into<String>, header_row: HeaderRow, rows: Vec<Row>) -> Self {
        let source_id = source_id.into();
        Self {
            title: source_id.clone(),
            source_id,
            header_row,
            rows,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// First data row, used as the type inference sample.
    pub fn sample_row(&self) -> Option<&[CellValue]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn column_count(&self) -> usize {
        self.header_row.len()
    }
}
