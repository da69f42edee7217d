//! Decides whether a recorded sync timestamp can still be trusted.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sheetmap_model::{FieldConfig, PersistedContext};

/// Returns true when the prior sync timestamp must be discarded and all
/// rows synced again.
///
/// That is the case for a first sync, a changed slug field, or changed
/// field definitions on the host.
pub fn should_force_full_resync(context: &PersistedContext, final_slug_column_id: &str) -> bool {
    match context {
        PersistedContext::Create => true,
        PersistedContext::Update(update) => {
            update.slug_column_id != final_slug_column_id || update.has_changed_fields
        }
    }
}

/// Timestamp to hand to the sync executor; `None` forces a full resync.
pub fn last_synced_time_for(
    context: &PersistedContext,
    final_slug_column_id: &str,
) -> Option<DateTime<Utc>> {
    if should_force_full_resync(context, final_slug_column_id) {
        return None;
    }
    match context {
        PersistedContext::Create => None,
        PersistedContext::Update(update) => update.last_synced_time,
    }
}

/// Compares the host's current field definitions to the persisted ones.
///
/// Order is ignored; any added, removed, renamed or retyped field counts
/// as a change.
pub fn fields_changed(current: &[FieldConfig], persisted: &[FieldConfig]) -> bool {
    let key = |field: &FieldConfig| (field.id.clone(), field.name.clone(), field.field_type);
    let current: BTreeSet<_> = current.iter().map(key).collect();
    let persisted: BTreeSet<_> = persisted.iter().map(key).collect();
    current != persisted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sheetmap_model::{FieldType, UpdateContext};

    fn update(slug: &str, has_changed_fields: bool) -> PersistedContext {
        PersistedContext::Update(UpdateContext {
            fields: vec![],
            slug_column_id: slug.to_string(),
            ignored_column_ids: BTreeSet::new(),
            last_synced_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            has_changed_fields,
        })
    }

    #[test]
    fn create_always_forces_resync() {
        assert!(should_force_full_resync(&PersistedContext::Create, "Name"));
        assert_eq!(last_synced_time_for(&PersistedContext::Create, "Name"), None);
    }

    #[test]
    fn update_forces_resync_on_slug_or_field_change() {
        assert!(!should_force_full_resync(&update("Name", false), "Name"));
        assert!(should_force_full_resync(&update("Name", false), "Sku"));
        assert!(should_force_full_resync(&update("Name", true), "Name"));
    }

    #[test]
    fn unchanged_update_keeps_timestamp() {
        assert_eq!(
            last_synced_time_for(&update("Name", false), "Name"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(last_synced_time_for(&update("Name", false), "Sku"), None);
    }

    #[test]
    fn field_changes_ignore_order() {
        let a = FieldConfig::new("A", "A", FieldType::String);
        let b = FieldConfig::new("B", "B", FieldType::Number);
        assert!(!fields_changed(&[a.clone(), b.clone()], &[b.clone(), a.clone()]));
        assert!(fields_changed(&[a.clone()], &[a.clone(), b.clone()]));

        let retyped = FieldConfig::new("B", "B", FieldType::String);
        assert!(fields_changed(&[a.clone(), retyped], &[a, b]));
    }
}
