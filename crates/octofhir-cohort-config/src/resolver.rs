//! Configuration resolver
//!
//! Read-only lookup surface over a loaded [`CompilerConfig`]. Every lookup is
//! total: a missing mapping yields an empty string or an empty set.

use crate::parser::{parse_json, parse_xml};
use crate::template::{self, render};
use crate::types::{
    Codesystem, CompilationFact, CompilerConfig, FieldMapping, POPULATION_MARKER, Singleton,
};
use crate::ConfigError;
use indexmap::IndexSet;
use octofhir_cohort_model::{DataElementId, EntityType};
use std::path::Path;
use std::sync::Arc;

/// Shared, immutable configuration handle
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    config: Arc<CompilerConfig>,
}

impl ConfigResolver {
    pub fn new(config: CompilerConfig) -> Self {
        log::debug!("Loaded compiler configuration with {} data elements", config.fields.len());
        Self {
            config: Arc::new(config),
        }
    }

    /// Load configuration from an XML string
    pub fn from_xml(xml: &str) -> Result<Self, ConfigError> {
        let document = parse_xml(xml)?;
        Ok(Self::new(CompilerConfig::from_document(document)))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document = parse_json(json)?;
        Ok(Self::new(CompilerConfig::from_document(document)))
    }

    pub fn from_xml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let xml = std::fs::read_to_string(path)?;
        Self::from_xml(&xml)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Auto-detect and load configuration from file based on extension (.xml or .json)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("xml") => Self::from_xml_file(path),
            Some("json") => Self::from_json_file(path),
            Some(ext) => Err(ConfigError::UnsupportedFormat(format!(
                "Unsupported file extension: .{}. Expected .xml or .json",
                ext
            ))),
            None => Err(ConfigError::UnsupportedFormat(
                "No file extension found. Expected .xml or .json".to_string(),
            )),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn field(&self, id: &DataElementId) -> Option<&FieldMapping> {
        self.config.field(id)
    }

    pub fn fact(&self, id: &DataElementId, entity_type: EntityType) -> Option<&CompilationFact> {
        self.config.fact(id, entity_type)
    }

    /// Wrap an atomic expression in the configured resource path.
    ///
    /// Returns an empty string when no path template is registered.
    pub fn path_expression(&self, id: &DataElementId, entity_type: EntityType, atomic: &str) -> String {
        let Some(path) = self.fact(id, entity_type).and_then(CompilationFact::path_template) else {
            log::trace!("No path template for '{}' ({})", id, entity_type);
            return String::new();
        };

        let extension = self.extension_name(id);
        render(path, &[(template::ATOMIC, atomic), (template::EXTENSION, &extension)])
    }

    /// Render the atomic template for an operator, falling back to `DEFAULT`.
    ///
    /// Returns an empty string when neither template is registered.
    pub fn atomic_expression(
        &self,
        id: &DataElementId,
        entity_type: EntityType,
        operator_key: &str,
        value: &str,
        max_value: &str,
    ) -> String {
        let Some(atomic) = self
            .fact(id, entity_type)
            .and_then(|fact| fact.atomic_template(operator_key))
        else {
            log::trace!("No atomic template '{}' for '{}' ({})", operator_key, id, entity_type);
            return String::new();
        };

        let extension = self.extension_name(id);
        render(
            atomic,
            &[
                (template::VALUE, value),
                (template::MAX_VALUE, max_value),
                (template::EXTENSION, &extension),
            ],
        )
    }

    /// Render the template registered for exactly `operator_key`.
    ///
    /// Conditions without an operand resolve here: the `DEFAULT` template
    /// expects a value and never applies to them.
    pub fn operator_expression(&self, id: &DataElementId, entity_type: EntityType, operator_key: &str) -> String {
        let Some(atomic) = self
            .fact(id, entity_type)
            .and_then(|fact| fact.operator_template(operator_key))
        else {
            log::trace!("No '{}' template for '{}' ({})", operator_key, id, entity_type);
            return String::new();
        };

        let extension = self.extension_name(id);
        render(atomic, &[(template::EXTENSION, &extension)])
    }

    /// Codesystems referenced by a data element.
    ///
    /// Field-level codesystems are always included. With an entity type only
    /// that entity's codesystems are added, without one those of every entity.
    pub fn codesystems(&self, id: &DataElementId, entity_type: Option<EntityType>) -> IndexSet<Codesystem> {
        let Some(field) = self.field(id) else {
            return IndexSet::new();
        };

        let mut codesystems = field.codesystems.clone();
        match entity_type {
            Some(entity_type) => {
                if let Some(fact) = field.entities.get(&entity_type) {
                    codesystems.extend(fact.codesystems.iter().cloned());
                }
            }
            None => {
                for fact in field.entities.values() {
                    codesystems.extend(fact.codesystems.iter().cloned());
                }
            }
        }
        codesystems
    }

    pub fn singletons(&self, id: &DataElementId, entity_type: EntityType) -> IndexSet<Singleton> {
        self.fact(id, entity_type)
            .map(|fact| fact.singletons.clone())
            .unwrap_or_default()
    }

    pub fn extension_name(&self, id: &DataElementId) -> String {
        self.field(id)
            .and_then(|field| field.extension.clone())
            .unwrap_or_default()
    }

    /// Library header ending in the `define InInitialPopulation:` marker
    pub fn preamble(&self, entity_type: EntityType, codesystem_block: &str) -> String {
        self.preamble_with_definitions(entity_type, codesystem_block, "")
    }

    /// Library header with `definitions` placed ahead of the population marker.
    ///
    /// Without a `{definitions}` slot the definitions go right before the
    /// last `define InInitialPopulation:`, or at the end when the header has
    /// no such marker.
    pub fn preamble_with_definitions(
        &self,
        entity_type: EntityType,
        codesystem_block: &str,
        definitions: &str,
    ) -> String {
        let preamble = &self.config.preamble;
        let has_slot = preamble.contains(&format!("{{{}}}", template::DEFINITIONS));

        let mut rendered = render(
            preamble,
            &[
                (template::CODESYSTEMS, codesystem_block),
                (template::ENTITY_TYPE, entity_type.as_str()),
                (template::DEFINITIONS, definitions),
            ],
        );

        if !has_slot && !definitions.is_empty() {
            match rendered.rfind(POPULATION_MARKER) {
                Some(at) => rendered.insert_str(at, definitions),
                None => rendered.push_str(definitions),
            }
        }
        rendered
    }
}
