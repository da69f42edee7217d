use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sheetmap_map::MappingState;
use sheetmap_model::FieldConfig;
use sheetmap_cli::pipeline::MapResult;

pub fn print_mapping(result: &MapResult) {
    let state = &result.state;
    println!("Source: {} ({} rows)", result.source_id, result.row_count);
    if let Some(path) = &result.saved_to {
        println!("Context saved: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Enabled"),
        header_cell("Slug"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    for field in state.field_configs() {
        table.add_row(field_row(state, field));
    }
    eprintln!("{table}");

    let summary = state.summary();
    let resync = if result.options.forces_full_resync() {
        "full resync"
    } else {
        "incremental"
    };
    eprintln!(
        "{} enabled, {} ignored, {} renamed, {} slug candidates ({resync})",
        summary.enabled, summary.disabled, summary.renamed, summary.slug_candidates
    );
}

fn field_row(state: &MappingState, field: &FieldConfig) -> Vec<Cell> {
    let enabled = !state.is_disabled(&field.id);
    let is_slug = state.slug_column_id() == Some(field.id.as_str());
    let name = state.effective_name(field);
    let name_cell = if enabled {
        Cell::new(name)
    } else {
        dim_cell(name)
    };
    vec![
        dim_cell(&field.id),
        name_cell,
        Cell::new(field.field_type.label()),
        if enabled {
            Cell::new("yes").fg(Color::Green)
        } else {
            dim_cell("no")
        },
        if is_slug {
            Cell::new("*").fg(Color::Cyan).add_attribute(Attribute::Bold)
        } else {
            Cell::new("")
        },
    ]
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
