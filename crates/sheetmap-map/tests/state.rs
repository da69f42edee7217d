//! Tests for mapping state transitions.

use sheetmap_map::{MappingError, MappingEvent, MappingState};
use sheetmap_model::{CellValue, FieldType, PersistedContext};

fn state(names: &[&str], sample: Vec<CellValue>) -> MappingState {
    let header_row: Vec<String> = names.iter().map(|name| (*name).to_string()).collect();
    MappingState::new(&header_row, Some(&sample), PersistedContext::Create)
}

fn catalog() -> MappingState {
    state(
        &["Name", "Price", "Sku", "Notes"],
        vec![
            "Widget".into(),
            19.99.into(),
            "W-1".into(),
            "line one\nline two".into(),
        ],
    )
}

#[test]
fn disabling_slug_moves_to_next_eligible() {
    let mut state = catalog();
    assert_eq!(state.slug_column_id(), Some("Name"));

    state.toggle_column("Name").expect("toggle");
    assert!(state.is_disabled("Name"));
    assert_eq!(state.slug_column_id(), Some("Sku"));

    state.toggle_column("Sku").expect("toggle");
    assert_eq!(state.slug_column_id(), None);
}

#[test]
fn re_enabling_string_column_promotes_it_when_slug_empty() {
    let mut state = catalog();
    state.toggle_column("Name").expect("toggle");
    state.toggle_column("Sku").expect("toggle");
    assert_eq!(state.slug_column_id(), None);

    state.toggle_column("Sku").expect("toggle");
    assert_eq!(state.slug_column_id(), Some("Sku"));

    state.toggle_column("Name").expect("toggle");
    assert_eq!(state.slug_column_id(), Some("Sku"));
}

#[test]
fn re_enabling_non_string_column_does_not_promote() {
    let mut state = catalog();
    state.toggle_column("Name").expect("toggle");
    state.toggle_column("Sku").expect("toggle");
    state.toggle_column("Price").expect("toggle");
    state.toggle_column("Price").expect("toggle");
    assert_eq!(state.slug_column_id(), None);
}

#[test]
fn retyping_slug_away_from_string_replaces_it() {
    let mut state = catalog();
    state
        .apply(MappingEvent::RetypeColumn {
            id: "Name".to_string(),
            field_type: FieldType::Link,
        })
        .expect("retype");
    assert_eq!(state.slug_column_id(), Some("Sku"));

    state.retype_column("Sku", FieldType::Number).expect("retype");
    assert_eq!(state.slug_column_id(), None);

    state.retype_column("Notes", FieldType::String).expect("retype");
    assert_eq!(state.slug_column_id(), Some("Notes"));
}

#[test]
fn rename_only_touches_written_name() {
    let mut state = catalog();
    state
        .apply(MappingEvent::RenameColumn {
            id: "Name".to_string(),
            name: "Title".to_string(),
        })
        .expect("rename");
    assert_eq!(state.slug_column_id(), Some("Name"));

    let options = state.build_options().expect("options");
    assert_eq!(options.fields[0].id, "Name");
    assert_eq!(options.fields[0].name, "Title");
    assert_eq!(state.summary().renamed, 1);
}

#[test]
fn empty_override_falls_back_to_display_name() {
    let mut state = catalog();
    state.rename_column("Name", String::new()).expect("rename");
    let options = state.build_options().expect("options");
    assert_eq!(options.fields[0].name, "Name");
}

#[test]
fn select_slug_rejects_ineligible_fields() {
    let mut state = catalog();
    assert_eq!(
        state.select_slug("Price"),
        Err(MappingError::IneligibleSlug("Price".to_string()))
    );
    state.toggle_column("Sku").expect("toggle");
    assert_eq!(
        state.select_slug("Sku"),
        Err(MappingError::IneligibleSlug("Sku".to_string()))
    );
    assert_eq!(state.slug_column_id(), Some("Name"));
}

#[test]
fn unknown_ids_leave_state_untouched() {
    let mut state = catalog();
    let err = state
        .apply(MappingEvent::ToggleColumn {
            id: "Missing".to_string(),
        })
        .unwrap_err();
    assert_eq!(err, MappingError::UnknownField("Missing".to_string()));
    assert!(state.disabled_ids().is_empty());
}

#[test]
fn submit_is_blocked_without_slug() {
    let mut state = state(&["Price"], vec![CellValue::from(3_i64)]);
    assert_eq!(state.slug_column_id(), None);
    assert_eq!(state.submit(), Err(MappingError::MissingSlugField));
    assert!(!state.is_submitting());
}

#[test]
fn concurrent_submit_is_rejected() {
    let mut state = catalog();
    state.submit().expect("first submit");
    assert!(state.is_submitting());
    assert_eq!(state.submit(), Err(MappingError::SubmissionInFlight));

    state.finish_submission();
    assert!(state.submit().is_ok());
}

#[test]
fn reduce_applies_events_in_order() {
    let state = catalog()
        .reduce(MappingEvent::ToggleColumn {
            id: "Notes".to_string(),
        })
        .and_then(|state| {
            state.reduce(MappingEvent::SelectSlug {
                id: "Sku".to_string(),
            })
        })
        .expect("reduce");
    assert_eq!(state.slug_column_id(), Some("Sku"));
    let summary = state.summary();
    assert_eq!(summary.disabled, 1);
    assert_eq!(summary.enabled, 3);
    assert_eq!(summary.slug_candidates, 2);
}

#[test]
fn missing_sample_defaults_to_string() {
    let header_row = vec!["A".to_string(), "B".to_string()];
    let state = MappingState::new(&header_row, None, PersistedContext::Create);
    assert!(
        state
            .field_configs()
            .iter()
            .all(|field| field.field_type == FieldType::String)
    );

    let short_row = vec![CellValue::from(1_i64)];
    let state = MappingState::new(&header_row, Some(&short_row), PersistedContext::Create);
    assert_eq!(state.field("A").map(|f| f.field_type), Some(FieldType::Number));
    assert_eq!(state.field("B").map(|f| f.field_type), Some(FieldType::String));
}
