//! CLI command implementations

pub mod analyze;
pub mod index;
pub mod refine;
pub mod status;
