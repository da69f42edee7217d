//! Repository for persisting the context of earlier syncs.
//!
//! Each data source gets one JSON file holding the last submitted mapping
//! and its sync time. Loading it yields the `Update` context the next
//! mapping starts from.
//!
//! # Storage Format
//!
//! Contexts are stored as `{source_id}.json`, with every character that is
//! not alphanumeric replaced by `_`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sheetmap_model::{FieldConfig, PersistedContext, SyncMutationOptions, UpdateContext};

use crate::sync::fields_changed;

/// Repository for storing and retrieving persisted sync contexts.
#[derive(Debug, Clone)]
pub struct ContextRepository {
    /// Base directory for storing context files.
    base_dir: PathBuf,
}

/// Metadata about a stored context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMetadata {
    pub source_id: String,
    pub file_path: PathBuf,
    pub field_count: usize,
    pub ignored_count: usize,
    pub slug_column_id: String,
    pub last_synced_time: Option<DateTime<Utc>>,
}

/// Persisted context with repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContext {
    pub source_id: String,
    pub fields: Vec<FieldConfig>,
    pub slug_column_id: String,
    #[serde(default)]
    pub ignored_column_ids: Vec<String>,
    pub last_synced_time: Option<DateTime<Utc>>,
    pub saved_at: Option<DateTime<Utc>>,
    /// Version of the storage format.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredContext {
    /// Records a submitted mapping as synced at `synced_at`.
    pub fn from_submission(
        source_id: impl Into<String>,
        options: &SyncMutationOptions,
        synced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            fields: options.fields.clone(),
            slug_column_id: options.slug_column_id.clone(),
            ignored_column_ids: options.ignored_column_ids.clone(),
            last_synced_time: Some(synced_at),
            saved_at: Some(Utc::now()),
            version: default_version(),
        }
    }

    /// Turns the stored record into the context for the next mapping.
    ///
    /// `current_fields` are the host's field definitions right now; when
    /// given, any difference to the stored fields marks the context as
    /// changed.
    pub fn to_context(&self, current_fields: Option<&[FieldConfig]>) -> PersistedContext {
        let has_changed_fields =
            current_fields.is_some_and(|current| fields_changed(current, &self.fields));
        PersistedContext::Update(UpdateContext {
            fields: self.fields.clone(),
            slug_column_id: self.slug_column_id.clone(),
            ignored_column_ids: self.ignored_column_ids.iter().cloned().collect(),
            last_synced_time: self.last_synced_time,
            has_changed_fields,
        })
    }
}

impl ContextRepository {
    /// Create a new context repository at the given directory.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create context repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save a stored context, replacing any earlier one for the same source.
    pub fn save(&self, stored: &StoredContext) -> Result<PathBuf> {
        let path = self.context_path(&stored.source_id);
        let json = serde_json::to_string_pretty(stored)
            .with_context(|| format!("Failed to serialize context for {}", stored.source_id))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write context to {}", path.display()))?;
        debug!(source_id = %stored.source_id, path = %path.display(), "saved context");
        Ok(path)
    }

    /// Records a finished sync of `options` for `source_id`.
    pub fn record_sync(
        &self,
        source_id: &str,
        options: &SyncMutationOptions,
        synced_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        self.save(&StoredContext::from_submission(source_id, options, synced_at))
    }

    /// Load the stored context for a data source.
    ///
    /// Returns `None` if nothing was stored.
    pub fn load(&self, source_id: &str) -> Result<Option<StoredContext>> {
        let path = self.context_path(source_id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read context from {}", path.display()))?;
        let stored: StoredContext = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse context from {}", path.display()))?;
        Ok(Some(stored))
    }

    /// Context to start a mapping of `source_id` from: `Update` when a
    /// sync was recorded, `Create` otherwise.
    pub fn context_for(
        &self,
        source_id: &str,
        current_fields: Option<&[FieldConfig]>,
    ) -> Result<PersistedContext> {
        Ok(match self.load(source_id)? {
            Some(stored) => stored.to_context(current_fields),
            None => PersistedContext::Create,
        })
    }

    /// List all stored contexts, sorted by source id.
    pub fn list(&self) -> Result<Vec<ContextMetadata>> {
        let mut metadata = Vec::new();

        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let contents = fs::read_to_string(&path)?;
            if let Ok(stored) = serde_json::from_str::<StoredContext>(&contents) {
                metadata.push(ContextMetadata {
                    source_id: stored.source_id,
                    file_path: path,
                    field_count: stored.fields.len(),
                    ignored_count: stored.ignored_column_ids.len(),
                    slug_column_id: stored.slug_column_id,
                    last_synced_time: stored.last_synced_time,
                });
            }
        }

        metadata.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        Ok(metadata)
    }

    /// Delete the stored context of a data source.
    pub fn delete(&self, source_id: &str) -> Result<bool> {
        let path = self.context_path(source_id);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete context: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, source_id: &str) -> bool {
        self.context_path(source_id).exists()
    }

    fn context_path(&self, source_id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_id(source_id)))
    }
}

/// Normalize an ID for use in filenames.
fn normalize_id(id: &str) -> String {
    id.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
