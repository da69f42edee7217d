use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::{FieldConfig, FieldType};

/// Finalized mapping handed to the sync executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMutationOptions {
    /// Enabled fields only, with name overrides applied.
    pub fields: Vec<FieldConfig>,
    /// Type of every column in column order, disabled ones included.
    pub col_field_types: Vec<FieldType>,
    pub ignored_column_ids: Vec<String>,
    pub slug_column_id: String,
    /// `None` forces a full resync downstream.
    pub last_synced_time: Option<DateTime<Utc>>,
}

impl SyncMutationOptions {
    pub fn forces_full_resync(&self) -> bool {
        self.last_synced_time.is_none()
    }
}
