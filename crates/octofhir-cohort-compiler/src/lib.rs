//! Cohort query to CQL compiler
//!
//! Turns a query descriptor and a target entity type into a complete CQL
//! library. The pipeline is:
//! - atomic expressions per field value, or-joined per field
//! - field expressions wrapped in their resource path
//! - an and-joined population predicate (`true` when nothing applies)
//! - deduplicated codesystem and singleton definitions
//! - all of it substituted into the configured library preamble
//!
//! Both descriptor shapes (the richer [`QueryDescriptor`] and the
//! [`EssentialQuery`] DTO) feed the same pipeline through [`QuerySource`].
//!
//! # Example
//!
//! ```ignore
//! use octofhir_cohort_compiler::DescriptorTransformer;
//!
//! let transformer = DescriptorTransformer::new(resolver);
//! let cql = transformer.to_query(&descriptor, EntityType::Specimen);
//! ```
//!
//! [`QueryDescriptor`]: octofhir_cohort_model::QueryDescriptor
//! [`EssentialQuery`]: octofhir_cohort_model::EssentialQuery

mod atomic;
mod codesystems;
mod field;
mod options;
mod predicate;
mod singletons;
mod source;
mod transformer;

pub use atomic::*;
pub use codesystems::*;
pub use field::*;
pub use options::*;
pub use predicate::*;
pub use singletons::*;
pub use source::*;
pub use transformer::*;
