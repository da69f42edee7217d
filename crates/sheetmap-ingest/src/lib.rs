//! Data source ingestion: CSV files read into a header row plus typed rows.

pub mod cell;
pub mod error;
pub mod reader;
pub mod source;

pub use cell::parse_cell;
pub use error::{IngestError, Result};
pub use reader::{CsvOptions, read_csv_from, read_csv_sheet, source_path};
pub use source::CsvDirectorySource;
