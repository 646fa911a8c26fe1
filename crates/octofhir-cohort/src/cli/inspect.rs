//! Inspect command implementation

use super::output;
use anyhow::{Context, Result};
use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{DataElementId, EntityType};
use serde_json::{Value, json};
use std::path::PathBuf;

/// Configuration for inspect command
pub struct InspectConfig {
    pub config: PathBuf,
    pub urn: String,
    pub entity: Option<EntityType>,
    pub pretty: bool,
    pub output_file: Option<PathBuf>,
}

/// Show what the configuration holds for one data element
pub fn inspect(config: InspectConfig) -> Result<()> {
    let resolver = ConfigResolver::from_file(&config.config)
        .with_context(|| format!("Failed to load configuration: {}", config.config.display()))?;

    let value = describe(&resolver, &DataElementId::new(config.urn), config.entity)?;
    let content = output::format_json(&value, config.pretty)?;
    output::write_output(&content, config.output_file.as_deref())
}

/// Mapping of `id`, or of `id` for one entity type with its resolved codesystems
pub fn describe(resolver: &ConfigResolver, id: &DataElementId, entity: Option<EntityType>) -> Result<Value> {
    let Some(mapping) = resolver.field(id) else {
        anyhow::bail!("No configuration for data element {}", id);
    };

    let Some(entity_type) = entity else {
        return serde_json::to_value(mapping).context("Failed to serialize field mapping");
    };

    let Some(fact) = mapping.entities.get(&entity_type) else {
        eprintln!(
            "{}",
            output::format_warning(&format!("{} has no {} mapping", id, entity_type))
        );
        return Ok(Value::Null);
    };

    let codesystems: Vec<String> = resolver
        .codesystems(id, Some(entity_type))
        .iter()
        .map(|codesystem| codesystem.definition())
        .collect();

    Ok(json!({
        "urn": id,
        "entityType": entity_type,
        "extension": resolver.extension_name(id),
        "codesystems": codesystems,
        "fact": serde_json::to_value(fact).context("Failed to serialize compilation fact")?,
    }))
}
