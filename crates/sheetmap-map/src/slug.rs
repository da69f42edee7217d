//! Slug field eligibility and selection.
//!
//! A field is eligible when it is enabled and of type `string`. The
//! eligible set is always recomputed from the current fields and disabled
//! ids; nothing here caches it.

use std::collections::BTreeSet;

use sheetmap_model::{FieldConfig, PersistedContext};

/// Returns the fields that may hold the slug, in column order.
pub fn eligible_slug_fields<'a>(
    field_configs: &'a [FieldConfig],
    disabled_ids: &BTreeSet<String>,
) -> Vec<&'a FieldConfig> {
    field_configs
        .iter()
        .filter(|field| is_eligible(field, disabled_ids))
        .collect()
}

fn is_eligible(field: &FieldConfig, disabled_ids: &BTreeSet<String>) -> bool {
    field.field_type.can_be_slug() && !disabled_ids.contains(&field.id)
}

/// Returns true if `id` names an eligible field.
pub fn is_eligible_slug(
    id: &str,
    field_configs: &[FieldConfig],
    disabled_ids: &BTreeSet<String>,
) -> bool {
    field_configs
        .iter()
        .any(|field| field.id == id && is_eligible(field, disabled_ids))
}

/// Picks the slug for a new mapping.
///
/// The persisted slug is reused when it is still eligible; otherwise the
/// first eligible field wins. `None` means no field qualifies.
pub fn initial_slug(context: &PersistedContext, eligible: &[&FieldConfig]) -> Option<String> {
    if let PersistedContext::Update(update) = context
        && eligible.iter().any(|field| field.id == update.slug_column_id)
    {
        return Some(update.slug_column_id.clone());
    }
    first_eligible(eligible)
}

/// First eligible field in column order.
pub fn first_eligible(eligible: &[&FieldConfig]) -> Option<String> {
    eligible.first().map(|field| field.id.clone())
}

/// Keeps `current` when it is still eligible, otherwise picks the
/// replacement (first eligible field, or `None`).
pub fn reconcile_slug(
    current: Option<&str>,
    field_configs: &[FieldConfig],
    disabled_ids: &BTreeSet<String>,
) -> Option<String> {
    match current {
        Some(id) if is_eligible_slug(id, field_configs, disabled_ids) => Some(id.to_string()),
        _ => first_eligible(&eligible_slug_fields(field_configs, disabled_ids)),
    }
}
