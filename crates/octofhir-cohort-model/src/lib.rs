//! Cohort query data model
//!
//! This crate provides the input side of the cohort-to-CQL compiler:
//! - Data element identifiers (MDR URNs) and entity types
//! - Comparison conditions with explicit operand arity
//! - Typed field values and value constraints
//! - The `QueryDescriptor` built by request handlers
//! - The simplified "essential" DTO shape received from web clients

mod condition;
pub mod essential;
mod error;
mod identifier;
mod query;
mod value;

pub use condition::*;
pub use essential::{EssentialEntity, EssentialField, EssentialQuery, EssentialValue};
pub use error::*;
pub use identifier::*;
pub use query::*;
pub use value::*;
