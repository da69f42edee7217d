//! CLI library components for the sheet field mapper.

pub mod logging;
pub mod pipeline;
