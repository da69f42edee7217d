//! Field mapping engine for syncing a tabular data source into a managed
//! collection.
//!
//! The pieces, leaf first:
//!
//! - [`names`]: unique field ids from raw header cells
//! - [`inference`]: destination type from a sample cell
//! - [`builder`]: initial per-column field configuration
//! - [`slug`]: slug field eligibility and selection
//! - [`sync`]: whether a prior sync timestamp is still valid
//! - [`state`]: the mapping the user edits, and the submit payload
//! - [`session`]: cancellable loading around the mapping state
//! - [`repository`]: persisted contexts of earlier syncs

pub mod builder;
pub mod error;
pub mod inference;
pub mod names;
pub mod repository;
pub mod session;
pub mod slug;
pub mod state;
pub mod sync;

pub use builder::{InitialMapping, build_field_configs, build_initial_mapping};
pub use error::MappingError;
pub use inference::infer_field_type;
pub use names::resolve_unique_names;
pub use repository::{ContextMetadata, ContextRepository, StoredContext};
pub use session::{
    DataSourceProvider, HostNotifier, LoadHandle, LoadOutcome, MappingSession, SessionStep,
};
pub use slug::{eligible_slug_fields, initial_slug};
pub use state::{MappingEvent, MappingState, MappingSummary};
pub use sync::{fields_changed, last_synced_time_for, should_force_full_resync};
