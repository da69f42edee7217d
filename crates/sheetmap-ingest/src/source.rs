//! CSV files as a [`DataSourceProvider`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use sheetmap_map::{DataSourceProvider, LoadHandle};
use sheetmap_model::SheetData;

use crate::reader::{CsvOptions, read_csv_sheet, source_path};

/// Serves data sources from CSV files in one directory.
///
/// A source id is the file name below `root`; `.csv` is implied when the
/// id has no extension.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
    options: CsvOptions,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: CsvOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads a data source synchronously.
    pub fn read(&self, source_id: &str, handle: Option<&LoadHandle>) -> anyhow::Result<SheetData> {
        let path = source_path(&self.root, source_id);
        let mut sheet = read_csv_sheet(&path, self.options, handle)
            .with_context(|| format!("load data source {source_id}"))?;
        sheet.source_id = source_id.to_string();
        Ok(sheet)
    }
}

impl DataSourceProvider for CsvDirectorySource {
    async fn fetch(&self, source_id: &str, handle: &LoadHandle) -> anyhow::Result<SheetData> {
        self.read(source_id, Some(handle))
    }
}
