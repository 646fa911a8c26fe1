//! Cohort query to CQL compiler
//!
//! Facade over the workspace crates:
//! - [`model`]: query descriptors, conditions and values
//! - [`config`]: data element configuration and its loaders
//! - [`compiler`]: expression factories and the query transformers
//!
//! # Example
//!
//! ```ignore
//! use octofhir_cohort::{ConfigResolver, DescriptorTransformer, EntityType};
//!
//! let resolver = ConfigResolver::from_file("cql_config.xml")?;
//! let transformer = DescriptorTransformer::new(resolver);
//! let cql = transformer.to_query(&descriptor, EntityType::Patient);
//! ```

pub use octofhir_cohort_compiler as compiler;
pub use octofhir_cohort_config as config;
pub use octofhir_cohort_model as model;

// Convenience re-exports
pub use octofhir_cohort_compiler::{
    DescriptorTransformer, EssentialTransformer, FieldScope, GroupTargets, QueryTransformer,
    TransformerOptions,
};
pub use octofhir_cohort_config::{ConfigError, ConfigResolver};
pub use octofhir_cohort_model::{
    Condition, EntityGroup, EntityType, EssentialQuery, FieldConstraint, QueryDescriptor,
    ValueConstraint,
};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
