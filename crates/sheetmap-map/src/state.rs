//! Mapping state management for the interactive mapping workflow.
//!
//! [`MappingState`] is created once per data source selection and then
//! mutated only by [`MappingEvent`]s. Every transition leaves the slug
//! either empty or pointing at an enabled `string` field.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sheetmap_model::{
    CellValue, Column, FieldConfig, FieldType, PersistedContext, SheetData, SyncMutationOptions,
};
use tracing::{debug, info, warn};

use crate::builder::build_initial_mapping;
use crate::error::MappingError;
use crate::names::resolve_unique_names;
use crate::slug::{eligible_slug_fields, initial_slug, is_eligible_slug, reconcile_slug};
use crate::sync::last_synced_time_for;

/// A user edit applied to a [`MappingState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingEvent {
    /// Enable a disabled column or disable an enabled one.
    ToggleColumn { id: String },
    /// Set the display name written for a column.
    RenameColumn { id: String, name: String },
    /// Change the destination type of a column.
    RetypeColumn { id: String, field_type: FieldType },
    /// Pick the slug field among the eligible ones.
    SelectSlug { id: String },
}

/// Working state of a mapping for a single data source.
#[derive(Debug, Clone)]
pub struct MappingState {
    field_configs: Vec<FieldConfig>,
    disabled_ids: BTreeSet<String>,
    slug_column_id: Option<String>,
    name_overrides: BTreeMap<String, String>,
    context: PersistedContext,
    submitting: bool,
}

impl MappingState {
    /// Creates the state for a header row and optional sample row.
    pub fn new(
        header_row: &[String],
        sample_row: Option<&[CellValue]>,
        context: PersistedContext,
    ) -> Self {
        let columns = Column::from_header_row(header_row);
        let unique_names = resolve_unique_names(header_row);
        let initial = build_initial_mapping(&columns, &unique_names, &context, sample_row);
        let slug_column_id = {
            let eligible = eligible_slug_fields(&initial.field_configs, &initial.disabled_ids);
            initial_slug(&context, &eligible)
        };
        debug!(
            columns = initial.field_configs.len(),
            disabled = initial.disabled_ids.len(),
            slug = slug_column_id.as_deref().unwrap_or(""),
            "created mapping state"
        );
        Self {
            field_configs: initial.field_configs,
            disabled_ids: initial.disabled_ids,
            slug_column_id,
            name_overrides: initial.name_overrides,
            context,
            submitting: false,
        }
    }

    /// Creates the state for a loaded data source, sampling its first row.
    pub fn from_sheet(sheet: &SheetData, context: PersistedContext) -> Self {
        Self::new(&sheet.header_row, sheet.sample_row(), context)
    }

    pub fn field_configs(&self) -> &[FieldConfig] {
        &self.field_configs
    }

    pub fn field(&self, id: &str) -> Option<&FieldConfig> {
        self.field_configs.iter().find(|field| field.id == id)
    }

    pub fn disabled_ids(&self) -> &BTreeSet<String> {
        &self.disabled_ids
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled_ids.contains(id)
    }

    /// Current slug field id; `None` blocks submission.
    pub fn slug_column_id(&self) -> Option<&str> {
        self.slug_column_id.as_deref()
    }

    pub fn name_overrides(&self) -> &BTreeMap<String, String> {
        &self.name_overrides
    }

    pub fn context(&self) -> &PersistedContext {
        &self.context
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Fields that may currently hold the slug, in column order.
    pub fn eligible_slug_fields(&self) -> Vec<&FieldConfig> {
        eligible_slug_fields(&self.field_configs, &self.disabled_ids)
    }

    /// Name the field will be written with: a non-empty override, else its display name.
    pub fn effective_name(&self, field: &FieldConfig) -> String {
        match self.name_overrides.get(&field.id) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => field.name.clone(),
        }
    }

    /// Applies one user edit.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownField`] for ids not in the mapping and
    /// [`MappingError::IneligibleSlug`] when selecting a slug that does not
    /// qualify. The state is unchanged on error.
    pub fn apply(&mut self, event: MappingEvent) -> Result<(), MappingError> {
        match event {
            MappingEvent::ToggleColumn { id } => self.toggle_column(&id),
            MappingEvent::RenameColumn { id, name } => self.rename_column(&id, name),
            MappingEvent::RetypeColumn { id, field_type } => self.retype_column(&id, field_type),
            MappingEvent::SelectSlug { id } => self.select_slug(&id),
        }
    }

    /// Consuming form of [`MappingState::apply`].
    pub fn reduce(mut self, event: MappingEvent) -> Result<Self, MappingError> {
        self.apply(event)?;
        Ok(self)
    }

    pub fn toggle_column(&mut self, id: &str) -> Result<(), MappingError> {
        let field_type = self.require_field(id)?.field_type;

        if self.disabled_ids.remove(id) {
            debug!(field_id = %id, "enabled column");
            let slug_valid = self
                .slug_column_id
                .as_deref()
                .is_some_and(|slug| is_eligible_slug(slug, &self.field_configs, &self.disabled_ids));
            if field_type.can_be_slug() && !slug_valid {
                info!(field_id = %id, "promoted re-enabled column to slug");
                self.slug_column_id = Some(id.to_string());
            }
        } else {
            self.disabled_ids.insert(id.to_string());
            debug!(field_id = %id, "disabled column");
        }

        self.reconcile_slug();
        Ok(())
    }

    pub fn rename_column(&mut self, id: &str, name: String) -> Result<(), MappingError> {
        self.require_field(id)?;
        self.name_overrides.insert(id.to_string(), name);
        Ok(())
    }

    pub fn retype_column(&mut self, id: &str, field_type: FieldType) -> Result<(), MappingError> {
        let field = self
            .field_configs
            .iter_mut()
            .find(|field| field.id == id)
            .ok_or_else(|| MappingError::UnknownField(id.to_string()))?;
        field.field_type = field_type;
        debug!(field_id = %id, field_type = %field_type, "retyped column");

        self.reconcile_slug();
        Ok(())
    }

    pub fn select_slug(&mut self, id: &str) -> Result<(), MappingError> {
        self.require_field(id)?;
        if !is_eligible_slug(id, &self.field_configs, &self.disabled_ids) {
            return Err(MappingError::IneligibleSlug(id.to_string()));
        }
        self.slug_column_id = Some(id.to_string());
        Ok(())
    }

    /// Starts a submission and builds the payload for the sync executor.
    ///
    /// Only one submission may be pending; call
    /// [`MappingState::finish_submission`] once the executor is done.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::SubmissionInFlight`] while a submission is
    /// pending and [`MappingError::MissingSlugField`] when no slug is set.
    pub fn submit(&mut self) -> Result<SyncMutationOptions, MappingError> {
        if self.submitting {
            warn!("rejected submission while another is in flight");
            return Err(MappingError::SubmissionInFlight);
        }
        let options = self.build_options()?;
        self.submitting = true;
        info!(
            fields = options.fields.len(),
            ignored = options.ignored_column_ids.len(),
            slug = %options.slug_column_id,
            full_resync = options.forces_full_resync(),
            "submitting mapping"
        );
        Ok(options)
    }

    /// Clears the in-flight flag after the executor finished or failed.
    pub fn finish_submission(&mut self) {
        self.submitting = false;
    }

    /// Builds the payload without touching the in-flight flag.
    pub fn build_options(&self) -> Result<SyncMutationOptions, MappingError> {
        let slug_column_id = self
            .slug_column_id
            .clone()
            .ok_or(MappingError::MissingSlugField)?;

        let fields = self
            .field_configs
            .iter()
            .filter(|field| !self.is_disabled(&field.id))
            .map(|field| FieldConfig::new(field.id.clone(), self.effective_name(field), field.field_type))
            .collect();
        let col_field_types = self
            .field_configs
            .iter()
            .map(|field| field.field_type)
            .collect();
        let ignored_column_ids = self
            .field_configs
            .iter()
            .filter(|field| self.is_disabled(&field.id))
            .map(|field| field.id.clone())
            .collect();
        let last_synced_time = last_synced_time_for(&self.context, &slug_column_id);

        Ok(SyncMutationOptions {
            fields,
            col_field_types,
            ignored_column_ids,
            slug_column_id,
            last_synced_time,
        })
    }

    /// Counts for display.
    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            total_fields: self.field_configs.len(),
            enabled: self.field_configs.len() - self.disabled_ids.len(),
            disabled: self.disabled_ids.len(),
            slug_candidates: self.eligible_slug_fields().len(),
            renamed: self
                .name_overrides
                .iter()
                .filter(|(id, name)| {
                    !name.is_empty() && self.field(id).is_some_and(|field| &field.name != *name)
                })
                .count(),
        }
    }

    fn require_field(&self, id: &str) -> Result<&FieldConfig, MappingError> {
        self.field(id)
            .ok_or_else(|| MappingError::UnknownField(id.to_string()))
    }

    fn reconcile_slug(&mut self) {
        let next = reconcile_slug(
            self.slug_column_id.as_deref(),
            &self.field_configs,
            &self.disabled_ids,
        );
        if next != self.slug_column_id {
            info!(
                previous = self.slug_column_id.as_deref().unwrap_or(""),
                next = next.as_deref().unwrap_or(""),
                "slug field replaced"
            );
            self.slug_column_id = next;
        }
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    pub total_fields: usize,
    pub enabled: usize,
    pub disabled: usize,
    /// Fields currently eligible as slug.
    pub slug_candidates: usize,
    /// Fields whose written name differs from their display name.
    pub renamed: usize,
}
