//! Initial field configuration for a freshly selected data source.

use std::collections::{BTreeMap, BTreeSet};

use sheetmap_model::{CellValue, Column, FieldConfig, FieldType, PersistedContext};
use tracing::debug;

use crate::inference::infer_field_type;

/// Starting point of a mapping: per-column fields plus the carried-over
/// disabled set and name overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InitialMapping {
    pub field_configs: Vec<FieldConfig>,
    pub disabled_ids: BTreeSet<String>,
    pub name_overrides: BTreeMap<String, String>,
}

/// Builds one [`FieldConfig`] per column, in column order.
///
/// A persisted field with the same id keeps its type and name; new sample
/// data never overrides a previously configured type. Columns without a
/// persisted counterpart get their type from the sample cell, or `string`
/// when no sample exists.
pub fn build_field_configs(
    columns: &[Column],
    unique_names: &[String],
    context: &PersistedContext,
    sample_row: Option<&[CellValue]>,
) -> Vec<FieldConfig> {
    columns
        .iter()
        .zip(unique_names)
        .map(|(column, id)| {
            let persisted = match context {
                PersistedContext::Create => None,
                PersistedContext::Update(update) => update.field(id),
            };
            match persisted {
                Some(field) => FieldConfig::new(id.clone(), field.name.clone(), field.field_type),
                None => {
                    let field_type = sample_row
                        .and_then(|row| row.get(column.index))
                        .map_or(FieldType::String, infer_field_type);
                    debug!(field_id = %id, field_type = %field_type, "inferred field type");
                    FieldConfig::new(id.clone(), id.clone(), field_type)
                }
            }
        })
        .collect()
}

/// Disabled ids carried over from the persisted context, limited to
/// columns that still exist.
pub fn initial_disabled_ids(
    field_configs: &[FieldConfig],
    context: &PersistedContext,
) -> BTreeSet<String> {
    match context {
        PersistedContext::Create => BTreeSet::new(),
        PersistedContext::Update(update) => field_configs
            .iter()
            .filter(|field| update.ignored_column_ids.contains(&field.id))
            .map(|field| field.id.clone())
            .collect(),
    }
}

/// Persisted display names keyed by id, for fields that still exist.
pub fn initial_name_overrides(
    field_configs: &[FieldConfig],
    context: &PersistedContext,
) -> BTreeMap<String, String> {
    match context {
        PersistedContext::Create => BTreeMap::new(),
        PersistedContext::Update(update) => field_configs
            .iter()
            .filter_map(|field| {
                update
                    .field(&field.id)
                    .map(|persisted| (field.id.clone(), persisted.name.clone()))
            })
            .collect(),
    }
}

/// Composes the three initial pieces of a mapping.
pub fn build_initial_mapping(
    columns: &[Column],
    unique_names: &[String],
    context: &PersistedContext,
    sample_row: Option<&[CellValue]>,
) -> InitialMapping {
    let field_configs = build_field_configs(columns, unique_names, context, sample_row);
    let disabled_ids = initial_disabled_ids(&field_configs, context);
    let name_overrides = initial_name_overrides(&field_configs, context);
    InitialMapping {
        field_configs,
        disabled_ids,
        name_overrides,
    }
}
