//! Subscriber setup for the `sheetmap` binary.
//!
//! Level guide:
//!
//! - `error`: a data source or context file could not be read
//! - `warn`: an edit or submission was rejected
//! - `info`: slug changes, resolved context, submitted payload counts
//! - `debug`: per-column inference and each applied edit
//! - `trace`: sample cell values, only with `--log-data`

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use sheetmap_model::CellValue;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Crates whose events pass the default filter at the configured level.
const WORKSPACE_TARGETS: [&str; 5] = [
    "sheetmap",
    "sheetmap_cli",
    "sheetmap_ingest",
    "sheetmap_map",
    "sheetmap_model",
];

static CELL_VALUES_VISIBLE: AtomicBool = AtomicBool::new(false);

/// Shown in place of a cell value unless `--log-data` was given.
pub const HIDDEN_CELL: &str = "<hidden>";

/// Output style of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Honour `RUST_LOG` instead of `level_filter` when it is set.
    pub use_env_filter: bool,
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    /// Let sample cell values into trace events.
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_target: false,
            with_ansi: true,
            format: LogFormat::Pretty,
            log_file: None,
            log_data: false,
        }
    }
}

/// Renders a cell for a log event, hiding its content unless allowed.
pub fn loggable_cell(cell: &CellValue) -> String {
    if !CELL_VALUES_VISIBLE.load(Ordering::Relaxed) {
        return HIDDEN_CELL.to_string();
    }
    match cell {
        CellValue::Boolean(value) => value.to_string(),
        CellValue::Number(value) => value.to_string(),
        CellValue::Text(value) => format!("{value:?}"),
        CellValue::Null => "null".to_string(),
    }
}

/// Installs the global subscriber. Later calls are ignored.
///
/// # Errors
///
/// Fails when the log file cannot be opened for appending.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    install(config, writer);
    Ok(())
}

/// Installs the global subscriber with an explicit writer.
pub fn install(config: &LogConfig, writer: BoxMakeWriter) {
    CELL_VALUES_VISIBLE.store(config.log_data, Ordering::Relaxed);
    let _ = tracing_subscriber::registry()
        .with(output_layer(config, writer))
        .with(level_filter(config))
        .try_init();
}

fn output_layer(config: &LogConfig, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match config.format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        LogFormat::Pretty => base.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

fn level_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(default_directives(config.level_filter))
}

fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}
