//! Configuration model

use indexmap::{IndexMap, IndexSet};
use octofhir_cohort_model::{DataElementId, EntityType};
use serde::{Deserialize, Deserializer, Serialize};

/// Template key used when no operator-specific atomic template exists
pub const DEFAULT_OPERATOR: &str = "DEFAULT";

/// Statement the population predicate follows
pub const POPULATION_MARKER: &str = "define InInitialPopulation:";

/// Library header used when the configuration does not provide one
pub const DEFAULT_PREAMBLE: &str = "library Retrieve
using FHIR version '4.0.0'
include FHIRHelpers version '4.0.0'

{codesystems}
context {entity_type}

{definitions}define InInitialPopulation:
";

/// A named, URL-identified vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Codesystem {
    pub name: String,
    pub url: String,
}

impl Codesystem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn loinc() -> Self {
        Self::new("loinc", "http://loinc.org")
    }

    /// CQL `codesystem` statement
    pub fn definition(&self) -> String {
        format!("codesystem {}: '{}'", self.name, self.url)
    }
}

/// A resource bound by a `define ... singleton from` statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Singleton {
    pub name: String,
}

impl Singleton {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn definition(&self) -> String {
        format!("define {0}: singleton from([{0}])", self.name)
    }
}

/// Compilation facts for one (data element, entity type) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationFact {
    /// Resource path wrapped around the atomic expression (`{atomic}`)
    #[serde(rename = "path", default, skip_serializing_if = "Option::is_none")]
    pub path_template: Option<String>,
    /// Atomic expression templates keyed by operator key or `DEFAULT`
    #[serde(rename = "atomic", default)]
    pub atomic_templates: IndexMap<String, String>,
    #[serde(default)]
    pub codesystems: IndexSet<Codesystem>,
    #[serde(default)]
    pub singletons: IndexSet<Singleton>,
}

impl CompilationFact {
    /// Template for an operator, falling back to the `DEFAULT` template
    pub fn atomic_template(&self, operator_key: &str) -> Option<&str> {
        self.operator_template(operator_key)
            .or_else(|| non_blank(self.atomic_templates.get(DEFAULT_OPERATOR)))
    }

    /// Template registered for exactly `operator_key`, no fallback
    pub fn operator_template(&self, operator_key: &str) -> Option<&str> {
        non_blank(self.atomic_templates.get(operator_key))
    }

    pub fn path_template(&self) -> Option<&str> {
        non_blank(self.path_template.as_ref())
    }
}

fn non_blank(template: Option<&String>) -> Option<&str> {
    template.map(String::as_str).filter(|t| !t.trim().is_empty())
}

/// Everything configured for one data element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub urn: DataElementId,
    /// Extension name substituted for `{extension}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Codesystems referenced regardless of entity type
    #[serde(default)]
    pub codesystems: IndexSet<Codesystem>,
    #[serde(default, deserialize_with = "deserialize_entities")]
    pub entities: IndexMap<EntityType, CompilationFact>,
}

/// Entity mappings keyed by type name; unsupported names are skipped
fn deserialize_entities<'de, D>(deserializer: D) -> Result<IndexMap<EntityType, CompilationFact>, D::Error>
where
    D: Deserializer<'de>,
{
    let entities = IndexMap::<String, CompilationFact>::deserialize(deserializer)?;
    Ok(entities
        .into_iter()
        .filter_map(|(name, fact)| match name.parse::<EntityType>() {
            Ok(entity_type) => Some((entity_type, fact)),
            Err(_) => {
                log::warn!("Skipping unsupported entity type '{}'", name);
                None
            }
        })
        .collect())
}

impl FieldMapping {
    pub fn new(urn: impl Into<DataElementId>) -> Self {
        Self {
            urn: urn.into(),
            extension: None,
            codesystems: IndexSet::new(),
            entities: IndexMap::new(),
        }
    }

    fn merge(&mut self, other: FieldMapping) {
        if other.extension.is_some() {
            self.extension = other.extension;
        }
        self.codesystems.extend(other.codesystems);
        self.entities.extend(other.entities);
    }
}

/// Configuration document as read from a source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

/// Indexed, immutable configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub preamble: String,
    pub fields: IndexMap<DataElementId, FieldMapping>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            fields: IndexMap::new(),
        }
    }
}

impl CompilerConfig {
    /// Index a document by data element.
    ///
    /// Repeated data elements merge; entity mappings of a later entry
    /// replace those of an earlier one for the same entity type.
    pub fn from_document(document: ConfigDocument) -> Self {
        let mut fields: IndexMap<DataElementId, FieldMapping> = IndexMap::new();

        for mapping in document.fields {
            match fields.get_mut(&mapping.urn) {
                Some(existing) => {
                    log::warn!("Data element '{}' is configured more than once, merging", mapping.urn);
                    existing.merge(mapping);
                }
                None => {
                    fields.insert(mapping.urn.clone(), mapping);
                }
            }
        }

        let preamble = document
            .preamble
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREAMBLE.to_string());

        Self { preamble, fields }
    }

    pub fn field(&self, urn: &DataElementId) -> Option<&FieldMapping> {
        self.fields.get(urn)
    }

    pub fn fact(&self, urn: &DataElementId, entity_type: EntityType) -> Option<&CompilationFact> {
        self.field(urn).and_then(|f| f.entities.get(&entity_type))
    }
}
