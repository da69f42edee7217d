//! Integration tests for the mapping pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use sheetmap_cli::pipeline::{MapEdits, MapRequest, run_map};
use sheetmap_ingest::CsvOptions;
use sheetmap_map::ContextRepository;
use sheetmap_model::{FieldConfig, FieldType};
use tempfile::TempDir;

const ARTICLES: &str = "\
Title,Slug,Price,Published
Hello World,hello-world,19.99,TRUE
Second Post,second-post,5,FALSE
";

fn write_csv(dir: &Path) -> PathBuf {
    let path = dir.join("articles.csv");
    fs::write(&path, ARTICLES).unwrap();
    path
}

fn request(csv_path: PathBuf) -> MapRequest {
    MapRequest {
        csv_path,
        source_id: None,
        csv_options: CsvOptions::default(),
        repository: None,
        context_file: None,
        host_fields: None,
        edits: MapEdits::default(),
        save: false,
    }
}

#[test]
fn first_map_infers_types_and_forces_full_sync() {
    let dir = TempDir::new().unwrap();
    let result = run_map(&request(write_csv(dir.path()))).unwrap();

    assert_eq!(result.source_id, "articles");
    assert_eq!(result.row_count, 2);
    assert_eq!(result.options.slug_column_id, "Title");
    assert_eq!(
        result.options.col_field_types,
        vec![
            FieldType::String,
            FieldType::String,
            FieldType::Number,
            FieldType::Boolean
        ]
    );
    assert!(result.options.ignored_column_ids.is_empty());
    assert_eq!(result.options.last_synced_time, None);
    assert!(result.saved_to.is_none());
    assert!(!result.state.is_submitting());
}

#[test]
fn edits_shape_the_payload() {
    let dir = TempDir::new().unwrap();
    let mut req = request(write_csv(dir.path()));
    req.edits = MapEdits {
        disable: vec!["Title".to_string()],
        renames: vec![("Price".to_string(), "Cost".to_string())],
        retypes: vec![("Published".to_string(), FieldType::String)],
        slug: Some("Published".to_string()),
        ..MapEdits::default()
    };

    let options = run_map(&req).unwrap().options;

    assert_eq!(options.ignored_column_ids, vec!["Title"]);
    assert_eq!(options.slug_column_id, "Published");
    assert_eq!(
        options.fields,
        vec![
            FieldConfig::new("Slug", "Slug", FieldType::String),
            FieldConfig::new("Price", "Cost", FieldType::Number),
            FieldConfig::new("Published", "Published", FieldType::String),
        ]
    );
    assert_eq!(
        options.col_field_types,
        vec![
            FieldType::String,
            FieldType::String,
            FieldType::Number,
            FieldType::String
        ]
    );
}

#[test]
fn enable_of_an_enabled_column_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let mut req = request(write_csv(dir.path()));
    req.edits.enable = vec!["Title".to_string()];

    let options = run_map(&req).unwrap().options;
    assert!(options.ignored_column_ids.is_empty());
    assert_eq!(options.fields.len(), 4);
}

#[test]
fn unknown_column_edit_fails() {
    let dir = TempDir::new().unwrap();
    let mut req = request(write_csv(dir.path()));
    req.edits.renames = vec![("Missing".to_string(), "Name".to_string())];

    let error = run_map(&req).unwrap_err();
    assert!(format!("{error:#}").contains("Missing"));
}

#[test]
fn save_requires_repository() {
    let dir = TempDir::new().unwrap();
    let mut req = request(write_csv(dir.path()));
    req.save = true;

    assert!(run_map(&req).is_err());
}

#[test]
fn saved_sync_is_reused_on_next_map() {
    let dir = TempDir::new().unwrap();
    let repo_dir = dir.path().join("contexts");
    let csv_path = write_csv(dir.path());

    let mut first = request(csv_path.clone());
    first.repository = Some(repo_dir.clone());
    first.save = true;
    first.edits.disable = vec!["Price".to_string()];
    first.edits.retypes = vec![("Published".to_string(), FieldType::String)];
    let first_result = run_map(&first).unwrap();
    let saved_to = first_result.saved_to.expect("context saved");
    assert!(saved_to.exists());

    let stored = ContextRepository::new(&repo_dir)
        .unwrap()
        .load("articles")
        .unwrap()
        .expect("stored context");

    let mut second = request(csv_path);
    second.repository = Some(repo_dir);
    let options = run_map(&second).unwrap().options;

    assert_eq!(options.ignored_column_ids, vec!["Price"]);
    assert_eq!(options.col_field_types[3], FieldType::String);
    assert_eq!(options.slug_column_id, "Title");
    assert!(stored.last_synced_time.is_some());
    assert_eq!(options.last_synced_time, stored.last_synced_time);
}

#[test]
fn changing_the_slug_discards_the_sync_time() {
    let dir = TempDir::new().unwrap();
    let repo_dir = dir.path().join("contexts");
    let csv_path = write_csv(dir.path());

    let mut first = request(csv_path.clone());
    first.repository = Some(repo_dir.clone());
    first.save = true;
    run_map(&first).unwrap();

    let mut second = request(csv_path);
    second.repository = Some(repo_dir);
    second.edits.slug = Some("Slug".to_string());
    let options = run_map(&second).unwrap().options;

    assert_eq!(options.slug_column_id, "Slug");
    assert_eq!(options.last_synced_time, None);
}

#[test]
fn changed_host_fields_discard_the_sync_time() {
    let dir = TempDir::new().unwrap();
    let repo_dir = dir.path().join("contexts");
    let csv_path = write_csv(dir.path());

    let mut first = request(csv_path.clone());
    first.repository = Some(repo_dir.clone());
    first.save = true;
    run_map(&first).unwrap();

    let host_fields = dir.path().join("fields.json");
    let fields = vec![FieldConfig::new("Title", "Headline", FieldType::String)];
    fs::write(&host_fields, serde_json::to_string(&fields).unwrap()).unwrap();

    let mut second = request(csv_path);
    second.repository = Some(repo_dir);
    second.host_fields = Some(host_fields);
    let options = run_map(&second).unwrap().options;

    assert_eq!(options.last_synced_time, None);
}

#[test]
fn explicit_context_file_wins_over_repository() {
    let dir = TempDir::new().unwrap();
    let csv_path = write_csv(dir.path());
    let context_path = dir.path().join("context.json");
    fs::write(
        &context_path,
        r#"{
            "type": "update",
            "fields": [
                {"id": "Title", "name": "Title", "type": "string"},
                {"id": "Slug", "name": "Slug", "type": "string"},
                {"id": "Published", "name": "Live", "type": "boolean"}
            ],
            "slugColumnId": "Slug",
            "ignoredColumnIds": ["Price"],
            "lastSyncedTime": "2024-01-01T00:00:00Z",
            "hasChangedFields": false
        }"#,
    )
    .unwrap();

    let mut req = request(csv_path);
    req.repository = Some(dir.path().join("contexts"));
    req.context_file = Some(context_path);
    let options = run_map(&req).unwrap().options;

    assert_eq!(options.slug_column_id, "Slug");
    assert_eq!(options.ignored_column_ids, vec!["Price"]);
    assert_eq!(
        options.fields[2],
        FieldConfig::new("Published", "Live", FieldType::Boolean)
    );
    assert_eq!(
        options.last_synced_time.map(|time| time.to_rfc3339()),
        Some("2024-01-01T00:00:00+00:00".to_string())
    );
}
