use std::fs;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info;

use sheetmap_cli::pipeline::{
    MapEdits, MapRequest, MapResult, ingest, parse_assignment, parse_retype, run_map,
};
use sheetmap_ingest::CsvOptions;
use sheetmap_map::{ContextRepository, MappingState};
use sheetmap_model::{CellValue, PersistedContext};

use crate::cli::{ContextsArgs, InferArgs, MapArgs, SourceArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_infer(args: &InferArgs) -> Result<()> {
    let sheet = ingest(&args.source.csv, csv_options(&args.source)?)?;
    let state = MappingState::from_sheet(&sheet, PersistedContext::Create);
    let sample = sheet.sample_row().unwrap_or_default();

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Header"),
        header_cell("Id"),
        header_cell("Sample"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, field) in state.field_configs().iter().enumerate() {
        let header = sheet.header_row.get(index).map_or("", String::as_str);
        let cell = sample.get(index).unwrap_or(&CellValue::Null);
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(header),
            Cell::new(&field.id),
            Cell::new(sample_text(cell)),
            Cell::new(field.field_type.label()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_map_command(args: &MapArgs) -> Result<MapResult> {
    let request = MapRequest {
        csv_path: args.source.csv.clone(),
        source_id: args.source_id.clone(),
        csv_options: csv_options(&args.source)?,
        repository: args.repo.clone(),
        context_file: args.context.clone(),
        host_fields: args.host_fields.clone(),
        edits: map_edits(args)?,
        save: args.save,
    };
    let result = run_map(&request)?;
    let json = serde_json::to_string_pretty(&result.options).context("serialize payload")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote payload");
        }
        None => println!("{json}"),
    }
    Ok(result)
}

pub fn run_contexts(args: &ContextsArgs) -> Result<()> {
    let repository = ContextRepository::new(&args.repo)?;
    if let Some(source_id) = &args.delete {
        if repository.delete(source_id)? {
            println!("Deleted context for {source_id}");
        } else {
            println!("No context stored for {source_id}");
        }
        return Ok(());
    }

    let contexts = repository.list()?;
    if contexts.is_empty() {
        println!("No contexts in {}", repository.base_dir().display());
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Fields"),
        header_cell("Ignored"),
        header_cell("Slug"),
        header_cell("Last synced"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for context in contexts {
        let synced = context
            .last_synced_time
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            context.source_id,
            context.field_count.to_string(),
            context.ignored_count.to_string(),
            context.slug_column_id,
            synced,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn csv_options(args: &SourceArgs) -> Result<CsvOptions> {
    let Ok(delimiter) = u8::try_from(args.delimiter) else {
        bail!("delimiter must be a single-byte character");
    };
    Ok(CsvOptions {
        delimiter,
        ..CsvOptions::default()
    })
}

fn map_edits(args: &MapArgs) -> Result<MapEdits> {
    Ok(MapEdits {
        disable: args.disable.clone(),
        enable: args.enable.clone(),
        renames: args
            .rename
            .iter()
            .map(String::as_str)
            .map(parse_assignment)
            .collect::<Result<_>>()?,
        retypes: args
            .retype
            .iter()
            .map(String::as_str)
            .map(parse_retype)
            .collect::<Result<_>>()?,
        slug: args.slug.clone(),
    })
}

fn sample_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Boolean(value) => value.to_string(),
        CellValue::Number(value) => value.to_string(),
        CellValue::Text(value) => value.clone(),
        CellValue::Null => String::new(),
    }
}
