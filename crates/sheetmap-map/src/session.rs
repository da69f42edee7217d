//! Data source loading and the mapping step that follows it.
//!
//! At most one load is in flight per session. Starting another load, or
//! tearing the session down, cancels the outstanding one through its
//! [`LoadHandle`], and a cancelled load never touches session state.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sheetmap_model::{PersistedContext, SheetData};
use tracing::{debug, error, info};

use crate::state::MappingState;

/// Host capability for user-visible error reports.
pub trait HostNotifier {
    fn notify_error(&self, message: &str);
}

/// Fetches the raw contents of a data source.
///
/// Implementations should check `handle.is_cancelled()` between steps and
/// may bail out early; the session discards cancelled results regardless.
pub trait DataSourceProvider {
    fn fetch(
        &self,
        source_id: &str,
        handle: &LoadHandle,
    ) -> impl Future<Output = anyhow::Result<SheetData>> + Send;
}

// ============================================================================
// Load Handle (Cancellation)
// ============================================================================

/// Handle to cancel an in-progress load.
#[derive(Debug, Clone)]
pub struct LoadHandle {
    cancel_flag: Arc<AtomicBool>,
    generation: u64,
    source_id: String,
}

impl LoadHandle {
    fn new(generation: u64, source_id: &str) -> Self {
        Self {
            cancel_flag: Arc::new(AtomicBool::new(false)),
            generation,
            source_id: source_id.to_string(),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The data source was loaded and the session moved to mapping.
    Applied,
    /// The load was cancelled or superseded; nothing changed.
    Cancelled,
    /// The load failed; the host was notified and the session went back
    /// to data source selection.
    Failed,
}

/// Where the session currently is.
#[derive(Debug, Clone)]
pub enum SessionStep {
    SelectSource,
    Loading { source_id: String },
    Mapping(Box<MappingState>),
}

/// Owns the mapping state for one mounted view.
pub struct MappingSession<N: HostNotifier> {
    notifier: N,
    context: PersistedContext,
    step: SessionStep,
    current_load: Option<LoadHandle>,
    next_generation: u64,
}

impl<N: HostNotifier> MappingSession<N> {
    pub fn new(notifier: N, context: PersistedContext) -> Self {
        Self {
            notifier,
            context,
            step: SessionStep::SelectSource,
            current_load: None,
            next_generation: 0,
        }
    }

    pub fn step(&self) -> &SessionStep {
        &self.step
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.step, SessionStep::Loading { .. })
    }

    pub fn state(&self) -> Option<&MappingState> {
        match &self.step {
            SessionStep::Mapping(state) => Some(state.as_ref()),
            _ => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut MappingState> {
        match &mut self.step {
            SessionStep::Mapping(state) => Some(state.as_mut()),
            _ => None,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Starts loading a previously configured data source, cancelling any
    /// load still in flight.
    pub fn begin_load(&mut self, source_id: &str) -> LoadHandle {
        self.cancel_outstanding();
        self.next_generation += 1;
        let handle = LoadHandle::new(self.next_generation, source_id);
        self.current_load = Some(handle.clone());
        self.step = SessionStep::Loading {
            source_id: source_id.to_string(),
        };
        debug!(source_id, generation = handle.generation, "load started");
        handle
    }

    /// Commits the result of the load behind `handle`.
    ///
    /// Results of cancelled or superseded loads are dropped silently.
    pub fn complete_load(
        &mut self,
        handle: &LoadHandle,
        result: anyhow::Result<SheetData>,
    ) -> LoadOutcome {
        let is_current = self
            .current_load
            .as_ref()
            .is_some_and(|current| current.generation == handle.generation);
        if handle.is_cancelled() || !is_current {
            debug!(source_id = %handle.source_id, "discarded cancelled load");
            return LoadOutcome::Cancelled;
        }
        self.current_load = None;

        match result {
            Ok(sheet) => {
                info!(
                    source_id = %handle.source_id,
                    columns = sheet.column_count(),
                    rows = sheet.rows.len(),
                    "data source loaded"
                );
                self.enter_mapping(&sheet);
                LoadOutcome::Applied
            }
            Err(err) => {
                error!(source_id = %handle.source_id, error = %format!("{err:#}"), "load failed");
                self.notifier.notify_error(&format!(
                    "Error loading previously configured data source \u{201c}{}\u{201d}. Check the logs for more details.",
                    handle.source_id
                ));
                self.step = SessionStep::SelectSource;
                LoadOutcome::Failed
            }
        }
    }

    /// Loads `source_id` through `provider` and commits the result.
    pub async fn load<P: DataSourceProvider>(
        &mut self,
        provider: &P,
        source_id: &str,
    ) -> LoadOutcome {
        let handle = self.begin_load(source_id);
        let result = provider.fetch(source_id, &handle).await;
        self.complete_load(&handle, result)
    }

    /// Uses a data source the user picked directly.
    pub fn select_source(&mut self, sheet: &SheetData) {
        self.cancel_outstanding();
        self.enter_mapping(sheet);
    }

    /// Drops the current data source and returns to selection.
    pub fn reset(&mut self) {
        self.cancel_outstanding();
        self.step = SessionStep::SelectSource;
    }

    /// Cancels outstanding work when the owning view goes away.
    pub fn teardown(&mut self) {
        self.cancel_outstanding();
    }

    fn cancel_outstanding(&mut self) {
        if let Some(handle) = self.current_load.take() {
            debug!(source_id = %handle.source_id, "cancelled outstanding load");
            handle.cancel();
        }
    }

    fn enter_mapping(&mut self, sheet: &SheetData) {
        let state = MappingState::from_sheet(sheet, self.context.clone());
        self.step = SessionStep::Mapping(Box::new(state));
    }
}

impl<N: HostNotifier> Drop for MappingSession<N> {
    fn drop(&mut self) {
        self.cancel_outstanding();
    }
}
