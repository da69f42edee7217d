//! CSV reading into header row plus typed rows.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use sheetmap_map::LoadHandle;
use sheetmap_model::{CellValue, HeaderRow, Row, SheetData};
use tracing::{debug, trace};

use crate::cell::parse_cell;
use crate::error::{IngestError, Result};

/// How often the reader checks for cancellation, in records.
const CANCEL_CHECK_INTERVAL: usize = 256;

/// Options for reading a CSV data source.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_rows: None,
        }
    }
}

/// Reads a CSV file; the first non-blank record is the header row.
///
/// Rows shorter than the header are padded with nulls, longer ones are
/// cut to the header width. Fully blank records are skipped.
pub fn read_csv_sheet(
    path: &Path,
    options: CsvOptions,
    handle: Option<&LoadHandle>,
) -> Result<SheetData> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|err| IngestError::CsvParse {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    })?;
    let source_id = path.display().to_string();
    let sheet = read_csv(file, &source_id, path, options, handle)?;
    Ok(match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => sheet.with_title(stem),
        None => sheet,
    })
}

/// Reads CSV from any reader, for in-memory sources.
pub fn read_csv_from<R: Read>(reader: R, source_id: &str, options: CsvOptions) -> Result<SheetData> {
    read_csv(reader, source_id, Path::new(source_id), options, None)
}

fn read_csv<R: Read>(
    reader: R,
    source_id: &str,
    path: &Path,
    options: CsvOptions,
    handle: Option<&LoadHandle>,
) -> Result<SheetData> {
    let parse_error = |source: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut header_row: Option<HeaderRow> = None;
    let mut rows: Vec<Row> = Vec::new();

    for (index, record) in reader.records().enumerate() {
        if index % CANCEL_CHECK_INTERVAL == 0 && handle.is_some_and(LoadHandle::is_cancelled) {
            return Err(IngestError::Cancelled {
                path: path.to_path_buf(),
            });
        }
        let record = record.map_err(parse_error)?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }

        match &header_row {
            None => {
                header_row = Some(record.iter().map(ToString::to_string).collect());
            }
            Some(header) => {
                let mut row: Row = record.iter().take(header.len()).map(parse_cell).collect();
                row.resize(header.len(), CellValue::Null);
                trace!(row = rows.len(), "read row");
                rows.push(row);
                if options.max_rows.is_some_and(|max| rows.len() >= max) {
                    break;
                }
            }
        }
    }

    let header_row = header_row.ok_or_else(|| IngestError::EmptyCsv {
        path: path.to_path_buf(),
    })?;
    debug!(
        source_id,
        columns = header_row.len(),
        rows = rows.len(),
        "read csv data source"
    );
    Ok(SheetData::new(source_id, header_row, rows))
}

/// Resolves a data source id to a file path below `root`.
pub fn source_path(root: &Path, source_id: &str) -> PathBuf {
    let candidate = root.join(source_id);
    if candidate.extension().is_some() {
        candidate
    } else {
        candidate.with_extension("csv")
    }
}
