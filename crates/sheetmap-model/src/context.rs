use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::FieldConfig;

/// Configuration carried over from an earlier sync, if one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PersistedContext {
    /// No prior mapping exists.
    Create,
    /// A mapping was submitted before for this data source.
    Update(UpdateContext),
}

impl PersistedContext {
    pub fn is_update(&self) -> bool {
        matches!(self, PersistedContext::Update(_))
    }

    pub fn as_update(&self) -> Option<&UpdateContext> {
        match self {
            PersistedContext::Create => None,
            PersistedContext::Update(update) => Some(update),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContext {
    pub fields: Vec<FieldConfig>,
    pub slug_column_id: String,
    #[serde(default)]
    pub ignored_column_ids: BTreeSet<String>,
    #[serde(default)]
    pub last_synced_time: Option<DateTime<Utc>>,
    /// Whether the host's current field definitions differ from `fields`.
    #[serde(default)]
    pub has_changed_fields: bool,
}

impl UpdateContext {
    /// Looks up the persisted field with the given id.
    pub fn field(&self, id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|field| field.id == id)
    }
}
