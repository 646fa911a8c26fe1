//! CLI functionality for the `cohort-cql` tool
//!
//! - Compilation of descriptor files
//! - Inspection of loaded configuration
//! - Output formatting

pub mod compile;
pub mod inspect;
pub mod output;
