pub mod cell;
pub mod context;
pub mod error;
pub mod field;
pub mod options;
pub mod sheet;

pub use cell::{CellValue, HeaderRow, Row};
pub use context::{PersistedContext, UpdateContext};
pub use error::{ModelError, Result};
pub use field::{Column, FieldConfig, FieldType};
pub use options::SyncMutationOptions;
pub use sheet::SheetData;
