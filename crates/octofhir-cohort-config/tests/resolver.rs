//! Tests for configuration loading and lookups
//!
//! Covers:
//! - XML and JSON sources describing the same mappings
//! - File loading with extension detection
//! - Path, atomic, codesystem, singleton and extension lookups
//! - Custom preamble templates
//! - Loader agreement on unsupported entity types and document roots

use octofhir_cohort_config::{Codesystem, ConfigError, ConfigResolver, Singleton};
use octofhir_cohort_model::{DataElementId, EntityType};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;

const GENDER: &str = "urn:mdr16:dataelement:23:1";
const AGE: &str = "urn:mdr16:dataelement:15:1";

const XML_CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cqlConfig>
    <uiField>
        <mdrUrn>urn:mdr16:dataelement:23:1</mdrUrn>
        <codesystem><name>loinc</name><url>http://loinc.org</url></codesystem>
        <entityType>
            <entityTypeName>Patient</entityTypeName>
            <pathCqlExpression>{atomic}</pathCqlExpression>
            <atomicExpression>
                <operator>DEFAULT</operator>
                <atomicCqlExpression>P.gender = '{value}'</atomicCqlExpression>
            </atomicExpression>
        </entityType>
        <entityType>
            <entityTypeName>Specimen</entityTypeName>
            <pathCqlExpression>exists(from [Patient] P where {atomic})</pathCqlExpression>
            <atomicExpression>
                <operator>DEFAULT</operator>
                <atomicCqlExpression>P.gender = '{value}'</atomicCqlExpression>
            </atomicExpression>
            <singleton><name>Patient</name></singleton>
        </entityType>
    </uiField>
    <uiField>
        <mdrUrn>urn:mdr16:dataelement:15:1</mdrUrn>
        <extensionUrl>https://fhir.example.org/StructureDefinition/Age</extensionUrl>
        <entityType>
            <entityTypeName>Patient</entityTypeName>
            <pathCqlExpression>exists(from P.extension E where E.url = '{extension}' and {atomic})</pathCqlExpression>
            <atomicExpression>
                <operator>...</operator>
                <atomicCqlExpression><![CDATA[(E.value < {max_value} and E.value > {value})]]></atomicCqlExpression>
            </atomicExpression>
            <codesystem><name>SampleMaterialType</name><url>https://fhir.example.org/CodeSystem/SampleMaterialType</url></codesystem>
        </entityType>
    </uiField>
</cqlConfig>"#;

const JSON_CONFIG: &str = r#"{
    "fields": [
        {
            "urn": "urn:mdr16:dataelement:23:1",
            "codesystems": [ { "name": "loinc", "url": "http://loinc.org" } ],
            "entities": {
                "Patient": {
                    "path": "{atomic}",
                    "atomic": { "DEFAULT": "P.gender = '{value}'" }
                },
                "Specimen": {
                    "path": "exists(from [Patient] P where {atomic})",
                    "atomic": { "DEFAULT": "P.gender = '{value}'" },
                    "singletons": [ { "name": "Patient" } ]
                }
            }
        },
        {
            "urn": "urn:mdr16:dataelement:15:1",
            "extension": "https://fhir.example.org/StructureDefinition/Age",
            "entities": {
                "Patient": {
                    "path": "exists(from P.extension E where E.url = '{extension}' and {atomic})",
                    "atomic": { "...": "(E.value < {max_value} and E.value > {value})" },
                    "codesystems": [
                        { "name": "SampleMaterialType", "url": "https://fhir.example.org/CodeSystem/SampleMaterialType" }
                    ]
                }
            }
        }
    ]
}"#;

fn id(urn: &str) -> DataElementId {
    DataElementId::new(urn)
}

fn xml_resolver() -> ConfigResolver {
    ConfigResolver::from_xml(XML_CONFIG).unwrap_or_else(|e| panic!("Failed to load config: {e}"))
}

fn json_resolver() -> ConfigResolver {
    ConfigResolver::from_json(JSON_CONFIG).unwrap_or_else(|e| panic!("Failed to load config: {e}"))
}

#[test]
fn test_xml_and_json_sources_are_equivalent() {
    assert_eq!(xml_resolver().config(), json_resolver().config());
}

#[rstest]
#[case::xml(xml_resolver())]
#[case::json(json_resolver())]
fn test_atomic_expression_default_template(#[case] resolver: ConfigResolver) {
    let expr = resolver.atomic_expression(&id(GENDER), EntityType::Patient, "=", "female", "");
    assert_eq!(expr, "P.gender = 'female'");
}

#[rstest]
#[case::xml(xml_resolver())]
#[case::json(json_resolver())]
fn test_atomic_expression_range_template(#[case] resolver: ConfigResolver) {
    let expr = resolver.atomic_expression(&id(AGE), EntityType::Patient, "...", "18", "65");
    assert_eq!(expr, "(E.value < 65 and E.value > 18)");
}

#[test]
fn test_atomic_expression_without_matching_template() {
    let resolver = xml_resolver();

    // No DEFAULT template for the age element
    assert_eq!(resolver.atomic_expression(&id(AGE), EntityType::Patient, "=", "18", ""), "");
    // No Specimen mapping for the age element
    assert_eq!(resolver.atomic_expression(&id(AGE), EntityType::Specimen, "...", "1", "2"), "");
}

#[test]
fn test_path_expression() {
    let resolver = xml_resolver();

    assert_eq!(
        resolver.path_expression(&id(GENDER), EntityType::Patient, "P.gender = 'male'"),
        "P.gender = 'male'"
    );
    assert_eq!(
        resolver.path_expression(&id(GENDER), EntityType::Specimen, "P.gender = 'male'"),
        "exists(from [Patient] P where P.gender = 'male')"
    );
    assert_eq!(
        resolver.path_expression(&id(AGE), EntityType::Patient, "X"),
        "exists(from P.extension E where E.url = 'https://fhir.example.org/StructureDefinition/Age' and X)"
    );
    assert_eq!(resolver.path_expression(&id(AGE), EntityType::Specimen, "X"), "");
}

#[test]
fn test_codesystems_scoping() {
    let resolver = xml_resolver();
    let material = Codesystem::new(
        "SampleMaterialType",
        "https://fhir.example.org/CodeSystem/SampleMaterialType",
    );

    let gender: Vec<_> = resolver.codesystems(&id(GENDER), None).into_iter().collect();
    assert_eq!(gender, vec![Codesystem::loinc()]);

    assert!(resolver.codesystems(&id(AGE), Some(EntityType::Patient)).contains(&material));
    assert!(resolver.codesystems(&id(AGE), Some(EntityType::Specimen)).is_empty());
    assert!(resolver.codesystems(&id(AGE), None).contains(&material));
}

#[test]
fn test_singletons_are_entity_specific() {
    let resolver = xml_resolver();

    assert!(resolver.singletons(&id(GENDER), EntityType::Patient).is_empty());
    let specimen: Vec<_> = resolver.singletons(&id(GENDER), EntityType::Specimen).into_iter().collect();
    assert_eq!(specimen, vec![Singleton::new("Patient")]);
}

#[test]
fn test_extension_name() {
    let resolver = xml_resolver();
    assert_eq!(
        resolver.extension_name(&id(AGE)),
        "https://fhir.example.org/StructureDefinition/Age"
    );
    assert_eq!(resolver.extension_name(&id(GENDER)), "");
}

#[test]
fn test_custom_preamble() {
    let xml = r#"<cqlConfig>
        <preamble><![CDATA[
library Cohort
using FHIR version '4.0.1'
{codesystems}context {entity_type}
{definitions}define InInitialPopulation:
        ]]></preamble>
    </cqlConfig>"#;

    let resolver = ConfigResolver::from_xml(xml).unwrap();
    assert_eq!(
        resolver.preamble(EntityType::Patient, ""),
        "library Cohort\nusing FHIR version '4.0.1'\ncontext Patient\ndefine InInitialPopulation:\n"
    );
}

#[test]
fn test_from_file_detects_format() {
    let mut xml_file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
    xml_file.write_all(XML_CONFIG.as_bytes()).unwrap();
    xml_file.flush().unwrap();

    let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    json_file.write_all(JSON_CONFIG.as_bytes()).unwrap();
    json_file.flush().unwrap();

    let from_xml = ConfigResolver::from_file(xml_file.path()).unwrap();
    let from_json = ConfigResolver::from_file(json_file.path()).unwrap();
    assert_eq!(from_xml.config(), from_json.config());
}

#[test]
fn test_missing_file_is_fatal() {
    let result = ConfigResolver::from_file("/nonexistent/cql-config.xml");
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[rstest]
#[case("<cqlConfig><uiField><mdrUrn>u</mdrUrn></cqlConfig>")]
#[case("<cqlConfig><uiField>")]
fn test_malformed_xml_is_fatal(#[case] xml: &str) {
    assert!(ConfigResolver::from_xml(xml).is_err());
}

#[test]
fn test_malformed_json_is_fatal() {
    assert!(matches!(
        ConfigResolver::from_json(r#"{"fields": [ { "entities": {} } ]}"#),
        Err(ConfigError::JsonError(_))
    ));
}

#[test]
fn test_preamble_without_definitions_slot() {
    let xml = r#"<cqlConfig>
        <preamble><![CDATA[
library Cohort
{codesystems}context {entity_type}

define InInitialPopulation:
        ]]></preamble>
    </cqlConfig>"#;

    let resolver = ConfigResolver::from_xml(xml).unwrap();
    assert_eq!(
        resolver.preamble_with_definitions(
            EntityType::Specimen,
            "",
            "define Patient: singleton from([Patient])\n\n"
        ),
        "library Cohort\ncontext Specimen\n\ndefine Patient: singleton from([Patient])\n\ndefine InInitialPopulation:\n"
    );
    assert_eq!(
        resolver.preamble(EntityType::Patient, ""),
        "library Cohort\ncontext Patient\n\ndefine InInitialPopulation:\n"
    );
}

#[test]
fn test_preamble_without_population_marker() {
    let xml = "<cqlConfig><preamble>library Cohort context {entity_type}</preamble></cqlConfig>";

    let resolver = ConfigResolver::from_xml(xml).unwrap();
    assert_eq!(
        resolver.preamble_with_definitions(EntityType::Patient, "", "define Specimen: singleton from([Specimen])\n"),
        "library Cohort context Patient\ndefine Specimen: singleton from([Specimen])\n"
    );
}

#[test]
fn test_operator_expression_ignores_default() {
    let resolver = xml_resolver();
    assert_eq!(resolver.operator_expression(&id(GENDER), EntityType::Patient, "is null"), "");
    assert_eq!(
        resolver.atomic_expression(&id(GENDER), EntityType::Patient, "is null", "", ""),
        "P.gender = ''"
    );
}

#[rstest]
#[case::xml(r#"<cqlConfig><uiField>
    <mdrUrn>urn:x</mdrUrn>
    <entityType><entityTypeName>Observation</entityTypeName><pathCqlExpression>O</pathCqlExpression></entityType>
    <entityType><entityTypeName>Patient</entityTypeName><pathCqlExpression>{atomic}</pathCqlExpression></entityType>
</uiField></cqlConfig>"#, ConfigResolver::from_xml)]
#[case::json(r#"{
    "fields": [
        {
            "urn": "urn:x",
            "entities": {
                "Observation": { "path": "O" },
                "Patient": { "path": "{atomic}" }
            }
        }
    ]
}"#, ConfigResolver::from_json)]
fn test_unsupported_entity_types_are_skipped(
    #[case] source: &str,
    #[case] load: fn(&str) -> Result<ConfigResolver, ConfigError>,
) {
    let resolver = load(source).unwrap();
    let field = resolver.field(&id("urn:x")).unwrap();

    let entities: Vec<_> = field.entities.keys().copied().collect();
    assert_eq!(entities, vec![EntityType::Patient]);
    assert_eq!(resolver.path_expression(&id("urn:x"), EntityType::Patient, "A"), "A");
}

#[rstest]
#[case::foreign_root("<modelInfo><uiField><mdrUrn>u</mdrUrn></uiField></modelInfo>")]
#[case::empty_foreign_root("<settings/>")]
#[case::no_root("<?xml version=\"1.0\"?>")]
fn test_wrong_document_root_is_fatal(#[case] xml: &str) {
    assert!(matches!(
        ConfigResolver::from_xml(xml),
        Err(ConfigError::InvalidStructure(_))
    ));
}
