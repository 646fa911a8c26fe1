//! Compile command implementation

use super::output;
use anyhow::{Context, Result};
use octofhir_cohort_compiler::{
    DescriptorTransformer, EssentialTransformer, FieldScope, GroupTargets, TransformerOptions,
};
use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{EntityType, EssentialQuery, QueryDescriptor};
use std::fs;
use std::path::PathBuf;

/// Configuration for compile command
pub struct CompileConfig {
    pub config: PathBuf,
    pub query: PathBuf,
    pub entity: EntityType,
    /// Read the query as the essential DTO shape
    pub essential: bool,
    pub scope: FieldScope,
    pub event_target: Option<EntityType>,
    pub output_file: Option<PathBuf>,
}

impl CompileConfig {
    fn options(&self) -> TransformerOptions {
        let mut targets = GroupTargets::default();
        if let Some(event_target) = self.event_target {
            targets = targets.with_event_target(event_target);
        }
        TransformerOptions::default()
            .with_targets(targets)
            .with_scope(self.scope)
    }
}

/// Compile a query file into a CQL library
pub fn compile(config: CompileConfig) -> Result<()> {
    let cql = compile_to_string(&config)?;
    output::write_output(&cql, config.output_file.as_deref())
}

/// Compile without writing, returning the CQL library
pub fn compile_to_string(config: &CompileConfig) -> Result<String> {
    let resolver = ConfigResolver::from_file(&config.config)
        .with_context(|| format!("Failed to load configuration: {}", config.config.display()))?;

    let content = fs::read_to_string(&config.query)
        .with_context(|| format!("Failed to read query file: {}", config.query.display()))?;

    let options = config.options();
    let cql = if config.essential {
        let query: EssentialQuery = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse essential query: {}", config.query.display()))?;
        EssentialTransformer::with_options(resolver, options).to_query(&query, config.entity)
    } else {
        let query: QueryDescriptor = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse query descriptor: {}", config.query.display()))?;
        if query.is_empty() {
            log::info!("Query descriptor has no fields; population is unrestricted");
        }
        DescriptorTransformer::with_options(resolver, options).to_query(&query, config.entity)
    };

    Ok(cql)
}
