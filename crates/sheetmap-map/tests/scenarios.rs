//! End-to-end mapping scenarios from header row to submit payload.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use sheetmap_map::{MappingState, resolve_unique_names, should_force_full_resync};
use sheetmap_model::{CellValue, FieldConfig, FieldType, PersistedContext, UpdateContext};

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn first_sync_of_sheet_with_duplicate_headers() {
    let header_row = headers(&["Name", "Name", "Price"]);
    let sample: Vec<CellValue> = vec!["Widget".into(), "Widget".into(), "19.99".into()];

    assert_eq!(resolve_unique_names(&header_row), vec!["Name", "Name 2", "Price"]);

    let mut state = MappingState::new(&header_row, Some(&sample), PersistedContext::Create);
    let types: Vec<FieldType> = state
        .field_configs()
        .iter()
        .map(|field| field.field_type)
        .collect();
    assert_eq!(
        types,
        vec![FieldType::String, FieldType::String, FieldType::Number]
    );
    assert_eq!(state.slug_column_id(), Some("Name"));
    assert!(should_force_full_resync(state.context(), "Name"));

    let options = state.submit().expect("submit");
    assert_eq!(options.last_synced_time, None);
    assert_eq!(options.col_field_types.len(), 3);
}

#[test]
fn resync_with_unchanged_update_context_keeps_timestamp() {
    let synced_at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
    let context = PersistedContext::Update(UpdateContext {
        fields: vec![
            FieldConfig::new("Name", "Name", FieldType::String),
            FieldConfig::new("Name 2", "Handle", FieldType::String),
            FieldConfig::new("Price", "Price", FieldType::Number),
        ],
        slug_column_id: "Name 2".to_string(),
        ignored_column_ids: BTreeSet::new(),
        last_synced_time: Some(synced_at),
        has_changed_fields: false,
    });
    let header_row = headers(&["Name", "Name", "Price"]);
    let sample: Vec<CellValue> = vec!["Widget".into(), "Widget".into(), 19.99.into()];

    let mut state = MappingState::new(&header_row, Some(&sample), context);
    assert_eq!(state.slug_column_id(), Some("Name 2"));
    assert!(!should_force_full_resync(state.context(), "Name 2"));

    let options = state.submit().expect("submit");
    assert_eq!(options.slug_column_id, "Name 2");
    assert_eq!(options.last_synced_time, Some(synced_at));
    assert_eq!(options.fields[1].name, "Handle");
}

#[test]
fn persisted_types_are_sticky() {
    let context = PersistedContext::Update(UpdateContext {
        fields: vec![FieldConfig::new("Published", "Published", FieldType::String)],
        slug_column_id: "Published".to_string(),
        ignored_column_ids: BTreeSet::new(),
        last_synced_time: None,
        has_changed_fields: false,
    });
    let header_row = headers(&["Published", "Cover"]);
    let sample: Vec<CellValue> = vec![
        "2024-02-02".into(),
        "https://cdn.example.com/cover.png".into(),
    ];

    let state = MappingState::new(&header_row, Some(&sample), context);
    assert_eq!(state.field("Published").map(|f| f.field_type), Some(FieldType::String));
    assert_eq!(state.field("Cover").map(|f| f.field_type), Some(FieldType::Image));
}

#[test]
fn changing_slug_forces_full_resync() {
    let context = PersistedContext::Update(UpdateContext {
        fields: vec![
            FieldConfig::new("Name", "Name", FieldType::String),
            FieldConfig::new("Sku", "Sku", FieldType::String),
        ],
        slug_column_id: "Name".to_string(),
        ignored_column_ids: BTreeSet::new(),
        last_synced_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
        has_changed_fields: false,
    });
    let mut state = MappingState::new(&headers(&["Name", "Sku"]), None, context);
    state.select_slug("Sku").expect("select slug");

    let options = state.submit().expect("submit");
    assert_eq!(options.last_synced_time, None);
}

#[test]
fn ignored_columns_carry_over_but_keep_their_type() {
    let context = PersistedContext::Update(UpdateContext {
        fields: vec![
            FieldConfig::new("Title", "Title", FieldType::String),
            FieldConfig::new("Body", "Body", FieldType::FormattedText),
        ],
        slug_column_id: "Title".to_string(),
        ignored_column_ids: BTreeSet::from(["Body".to_string(), "Removed".to_string()]),
        last_synced_time: None,
        has_changed_fields: true,
    });
    let mut state = MappingState::new(&headers(&["Title", "Body"]), None, context);
    assert_eq!(state.disabled_ids(), &BTreeSet::from(["Body".to_string()]));

    let options = state.submit().expect("submit");
    assert_eq!(options.fields.len(), 1);
    assert_eq!(options.ignored_column_ids, vec!["Body"]);
    assert_eq!(
        options.col_field_types,
        vec![FieldType::String, FieldType::FormattedText]
    );
    assert!(options.forces_full_resync());
}
