//! Mapping pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the CSV data source
//! 2. **Context**: resolve the persisted context (explicit file, repository, or none)
//! 3. **Map**: build the initial mapping and apply user edits
//! 4. **Submit**: produce the sync payload and optionally record the sync
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, trace};

use sheetmap_ingest::{CsvOptions, read_csv_sheet};
use sheetmap_map::{ContextRepository, MappingEvent, MappingState};
use sheetmap_model::{FieldConfig, FieldType, PersistedContext, SheetData, SyncMutationOptions};

use crate::logging::loggable_cell;

/// User edits collected from the command line, applied in field order:
/// disables, enables, renames, retypes, then the slug choice.
#[derive(Debug, Clone, Default)]
pub struct MapEdits {
    pub disable: Vec<String>,
    pub enable: Vec<String>,
    pub renames: Vec<(String, String)>,
    pub retypes: Vec<(String, FieldType)>,
    pub slug: Option<String>,
}

/// Inputs of a single `map` run.
#[derive(Debug, Clone)]
pub struct MapRequest {
    pub csv_path: PathBuf,
    /// Defaults to the CSV file stem.
    pub source_id: Option<String>,
    pub csv_options: CsvOptions,
    /// Directory of persisted contexts.
    pub repository: Option<PathBuf>,
    /// Explicit context file; takes precedence over the repository.
    pub context_file: Option<PathBuf>,
    /// The destination collection's current fields, for change detection.
    pub host_fields: Option<PathBuf>,
    pub edits: MapEdits,
    /// Record the sync in the repository after submitting.
    pub save: bool,
}

/// Result of a `map` run.
#[derive(Debug)]
pub struct MapResult {
    pub source_id: String,
    pub sheet_title: String,
    pub row_count: usize,
    pub state: MappingState,
    pub options: SyncMutationOptions,
    pub saved_to: Option<PathBuf>,
}

/// Parses `ID=VALUE`, splitting at the first `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ID=VALUE, got `{raw}`"))?;
    let id = id.trim();
    if id.is_empty() {
        bail!("missing column id in `{raw}`");
    }
    Ok((id.to_string(), value.to_string()))
}

/// Parses `ID=TYPE` where TYPE is a field type name or label.
pub fn parse_retype(raw: &str) -> Result<(String, FieldType)> {
    let (id, value) = parse_assignment(raw)?;
    let field_type = value
        .parse::<FieldType>()
        .with_context(|| format!("invalid field type in `{raw}`"))?;
    Ok((id, field_type))
}

/// Stage 1: read the data source.
pub fn ingest(path: &Path, options: CsvOptions) -> Result<SheetData> {
    let sheet = read_csv_sheet(path, options, None)
        .with_context(|| format!("read data source {}", path.display()))?;
    debug!(
        columns = sheet.column_count(),
        rows = sheet.rows.len(),
        "ingested data source"
    );
    if let Some(sample) = sheet.sample_row() {
        for (header, cell) in sheet.header_row.iter().zip(sample) {
            trace!(column = %header, value = %loggable_cell(cell), "sample cell");
        }
    }
    Ok(sheet)
}

/// Reads a JSON list of field configs.
pub fn load_host_fields(path: &Path) -> Result<Vec<FieldConfig>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read host fields {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parse host fields {}", path.display()))
}

/// Stage 2: resolve the context the mapping starts from.
pub fn resolve_context(
    source_id: &str,
    context_file: Option<&Path>,
    repository: Option<&ContextRepository>,
    host_fields: Option<&[FieldConfig]>,
) -> Result<PersistedContext> {
    if let Some(path) = context_file {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read context {}", path.display()))?;
        return serde_json::from_str(&contents)
            .with_context(|| format!("parse context {}", path.display()));
    }
    match repository {
        Some(repo) => repo.context_for(source_id, host_fields),
        None => Ok(PersistedContext::Create),
    }
}

/// Stage 3: apply the user's edits to a freshly built state.
///
/// Disable and enable only toggle columns not already in the requested state.
pub fn apply_edits(state: &mut MappingState, edits: &MapEdits) -> Result<()> {
    let mut events = Vec::new();
    for id in &edits.disable {
        if !state.is_disabled(id) {
            events.push(MappingEvent::ToggleColumn { id: id.clone() });
        }
    }
    for id in &edits.enable {
        if state.is_disabled(id) {
            events.push(MappingEvent::ToggleColumn { id: id.clone() });
        }
    }
    events.extend(
        edits
            .renames
            .iter()
            .map(|(id, name)| MappingEvent::RenameColumn {
                id: id.clone(),
                name: name.clone(),
            }),
    );
    events.extend(
        edits
            .retypes
            .iter()
            .map(|(id, field_type)| MappingEvent::RetypeColumn {
                id: id.clone(),
                field_type: *field_type,
            }),
    );
    if let Some(id) = &edits.slug {
        events.push(MappingEvent::SelectSlug { id: id.clone() });
    }
    for event in events {
        debug!(?event, "applying edit");
        state
            .apply(event.clone())
            .with_context(|| format!("apply edit {event:?}"))?;
    }
    Ok(())
}

/// Stage 4: submit the mapping and optionally record the sync.
pub fn submit(
    state: &mut MappingState,
    source_id: &str,
    repository: Option<&ContextRepository>,
    synced_at: DateTime<Utc>,
) -> Result<(SyncMutationOptions, Option<PathBuf>)> {
    let options = state.submit().context("submit mapping")?;
    let saved_to = match repository {
        Some(repo) => {
            let recorded = repo.record_sync(source_id, &options, synced_at);
            // The submission is over whether or not recording succeeded.
            state.finish_submission();
            Some(recorded?)
        }
        None => {
            state.finish_submission();
            None
        }
    };
    Ok((options, saved_to))
}

/// Runs every stage of a `map` request.
pub fn run_map(request: &MapRequest) -> Result<MapResult> {
    let sheet = ingest(&request.csv_path, request.csv_options)?;
    let source_id = request
        .source_id
        .clone()
        .unwrap_or_else(|| sheet.title.clone());
    let span = info_span!("map", source_id = %source_id);
    let _guard = span.enter();

    let repository = request
        .repository
        .as_ref()
        .map(ContextRepository::new)
        .transpose()?;
    if request.save && repository.is_none() {
        bail!("--save requires --repo");
    }
    let host_fields = request
        .host_fields
        .as_deref()
        .map(load_host_fields)
        .transpose()?;
    let context = resolve_context(
        &source_id,
        request.context_file.as_deref(),
        repository.as_ref(),
        host_fields.as_deref(),
    )?;
    info!(update = context.is_update(), "resolved context");

    let mut state = MappingState::from_sheet(&sheet, context);
    apply_edits(&mut state, &request.edits)?;

    let record_in = if request.save {
        repository.as_ref()
    } else {
        None
    };
    let (options, saved_to) = submit(&mut state, &source_id, record_in, Utc::now())?;
    info!(
        fields = options.fields.len(),
        ignored = options.ignored_column_ids.len(),
        full_resync = options.forces_full_resync(),
        "mapping complete"
    );

    Ok(MapResult {
        source_id,
        sheet_title: sheet.title.clone(),
        row_count: sheet.rows.len(),
        state,
        options,
        saved_to,
    })
}
