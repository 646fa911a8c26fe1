//! Configuration parser for XML and JSON formats
//!
//! XML layout:
//!
//! ```xml
//! <cqlConfig>
//!   <preamble><![CDATA[library Retrieve ...]]></preamble>
//!   <uiField>
//!     <mdrUrn>urn:mdr16:dataelement:23:1</mdrUrn>
//!     <extensionUrl>...</extensionUrl>
//!     <codesystem><name>loinc</name><url>http://loinc.org</url></codesystem>
//!     <entityType>
//!       <entityTypeName>Patient</entityTypeName>
//!       <pathCqlExpression>{atomic}</pathCqlExpression>
//!       <atomicExpression>
//!         <operator>DEFAULT</operator>
//!         <atomicCqlExpression>P.gender = '{value}'</atomicCqlExpression>
//!       </atomicExpression>
//!       <singleton><name>Patient</name></singleton>
//!     </entityType>
//!   </uiField>
//! </cqlConfig>
//! ```
//!
//! The JSON layout is the serde form of [`ConfigDocument`].

use crate::types::{Codesystem, CompilationFact, ConfigDocument, FieldMapping, Singleton};
use crate::ConfigError;
use octofhir_cohort_model::EntityType;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

/// Root element of a configuration document
pub const ROOT_ELEMENT: &str = "cqlConfig";

#[derive(Default)]
struct EntityBuilder {
    entity_type: Option<String>,
    fact: CompilationFact,
}

#[derive(Default)]
struct AtomicBuilder {
    operator: Option<String>,
    template: Option<String>,
}

#[derive(Default)]
struct CodesystemBuilder {
    name: Option<String>,
    url: Option<String>,
}

/// Parse a configuration document from XML
pub fn parse_xml(xml_content: &str) -> Result<ConfigDocument, ConfigError> {
    let mut reader = Reader::from_str(xml_content);

    let mut document = ConfigDocument::default();
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();

    let mut current_field: Option<FieldMapping> = None;
    let mut current_entity: Option<EntityBuilder> = None;
    let mut current_atomic: Option<AtomicBuilder> = None;
    let mut current_codesystem: Option<CodesystemBuilder> = None;
    let mut current_singleton: Option<String> = None;
    let mut root_seen = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if stack.is_empty() {
                    check_root(&tag_name)?;
                    root_seen = true;
                }

                match tag_name.as_str() {
                    "uiField" => current_field = Some(FieldMapping::new("")),
                    "entityType" if current_field.is_some() => {
                        current_entity = Some(EntityBuilder::default())
                    }
                    "atomicExpression" if current_entity.is_some() => {
                        current_atomic = Some(AtomicBuilder::default())
                    }
                    "codesystem" if current_field.is_some() => {
                        current_codesystem = Some(CodesystemBuilder::default())
                    }
                    "singleton" if current_entity.is_some() => {
                        current_singleton = Some(String::new())
                    }
                    _ => {}
                }

                stack.push(tag_name);
                text.clear();
            }
            Ok(Event::Empty(e)) if stack.is_empty() => {
                check_root(&String::from_utf8_lossy(e.name().as_ref()))?;
                root_seen = true;
            }
            Ok(Event::Text(t)) => text.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::CData(t)) => text.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::GeneralRef(r)) => text.push_str(&resolve_reference(&r)?),
            Ok(Event::End(_)) => {
                let Some(tag_name) = stack.pop() else {
                    return Err(ConfigError::InvalidStructure("Unbalanced closing tag".to_string()));
                };
                let parent = stack.last().map(String::as_str);
                let value = std::mem::take(&mut text);

                match (tag_name.as_str(), parent) {
                    ("preamble", _) => document.preamble = Some(block(&value)),
                    ("mdrUrn", Some("uiField")) => {
                        if let Some(field) = current_field.as_mut() {
                            field.urn = value.trim().into();
                        }
                    }
                    ("extensionUrl" | "extensionName", Some("uiField")) => {
                        if let Some(field) = current_field.as_mut() {
                            field.extension = scalar(&value);
                        }
                    }
                    ("entityTypeName", Some("entityType")) => {
                        if let Some(entity) = current_entity.as_mut() {
                            entity.entity_type = scalar(&value);
                        }
                    }
                    ("pathCqlExpression", Some("entityType")) => {
                        if let Some(entity) = current_entity.as_mut() {
                            entity.fact.path_template = scalar(&value);
                        }
                    }
                    ("operator", Some("atomicExpression")) => {
                        if let Some(atomic) = current_atomic.as_mut() {
                            atomic.operator = scalar(&value);
                        }
                    }
                    ("atomicCqlExpression", Some("atomicExpression")) => {
                        if let Some(atomic) = current_atomic.as_mut() {
                            atomic.template = scalar(&value);
                        }
                    }
                    ("name", Some("codesystem")) => {
                        if let Some(cs) = current_codesystem.as_mut() {
                            cs.name = scalar(&value);
                        }
                    }
                    ("url", Some("codesystem")) => {
                        if let Some(cs) = current_codesystem.as_mut() {
                            cs.url = scalar(&value);
                        }
                    }
                    ("name", Some("singleton")) => {
                        if let Some(singleton) = current_singleton.as_mut() {
                            *singleton = value.trim().to_string();
                        }
                    }
                    ("atomicExpression", _) => {
                        if let (Some(atomic), Some(entity)) = (current_atomic.take(), current_entity.as_mut()) {
                            let operator = atomic.operator.ok_or_else(|| {
                                ConfigError::InvalidStructure("atomicExpression without operator".to_string())
                            })?;
                            if let Some(template) = atomic.template {
                                entity.fact.atomic_templates.insert(operator, template);
                            }
                        }
                    }
                    ("codesystem", _) => {
                        if let Some(cs) = current_codesystem.take() {
                            let codesystem = match (cs.name, cs.url) {
                                (Some(name), Some(url)) => Codesystem::new(name, url),
                                _ => {
                                    return Err(ConfigError::InvalidStructure(
                                        "codesystem requires both name and url".to_string(),
                                    ));
                                }
                            };
                            match (parent, current_entity.as_mut(), current_field.as_mut()) {
                                (Some("entityType"), Some(entity), _) => {
                                    entity.fact.codesystems.insert(codesystem);
                                }
                                (Some("uiField"), _, Some(field)) => {
                                    field.codesystems.insert(codesystem);
                                }
                                _ => {}
                            }
                        }
                    }
                    ("singleton", _) => {
                        if let (Some(name), Some(entity)) = (current_singleton.take(), current_entity.as_mut()) {
                            if !name.is_empty() {
                                entity.fact.singletons.insert(Singleton::new(name));
                            }
                        }
                    }
                    ("entityType", Some("uiField")) => {
                        if let (Some(entity), Some(field)) = (current_entity.take(), current_field.as_mut()) {
                            finish_entity(entity, field)?;
                        }
                    }
                    ("uiField", _) => {
                        if let Some(field) = current_field.take() {
                            if field.urn.as_str().is_empty() {
                                return Err(ConfigError::InvalidStructure(
                                    "uiField without mdrUrn".to_string(),
                                ));
                            }
                            document.fields.push(field);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConfigError::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ConfigError::InvalidStructure(format!(
            "Unclosed element <{}>",
            stack.join("/")
        )));
    }

    if !root_seen {
        return Err(ConfigError::InvalidStructure(format!(
            "Missing <{ROOT_ELEMENT}> root element"
        )));
    }

    Ok(document)
}

fn check_root(tag_name: &str) -> Result<(), ConfigError> {
    if tag_name == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(ConfigError::InvalidStructure(format!(
            "Expected <{ROOT_ELEMENT}> root element, found <{tag_name}>"
        )))
    }
}

fn finish_entity(entity: EntityBuilder, field: &mut FieldMapping) -> Result<(), ConfigError> {
    let name = entity.entity_type.ok_or_else(|| {
        ConfigError::InvalidStructure(format!("entityType without entityTypeName in '{}'", field.urn))
    })?;

    match name.parse::<EntityType>() {
        Ok(entity_type) => {
            field.entities.insert(entity_type, entity.fact);
        }
        Err(_) => {
            log::warn!("Skipping unsupported entity type '{}' for '{}'", name, field.urn);
        }
    }
    Ok(())
}

/// Trimmed element text, `None` when blank
fn scalar(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Multi-line template text: surrounding blank space removed, one trailing newline
fn block(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{value}\n")
    }
}

/// Character references and the predefined XML entities
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, ConfigError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch.to_string());
    }

    let name = reference.decode().map_err(quick_xml::Error::from)?;
    resolve_predefined_entity(&name)
        .map(String::from)
        .ok_or_else(|| ConfigError::InvalidStructure(format!("Unknown entity reference '&{name};'")))
}

/// Parse a configuration document from JSON
pub fn parse_json(json_content: &str) -> Result<ConfigDocument, ConfigError> {
    Ok(serde_json::from_str(json_content)?)
}
