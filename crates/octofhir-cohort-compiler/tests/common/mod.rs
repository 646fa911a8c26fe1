//! Shared fixtures for compiler integration tests

#![allow(dead_code)]

use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{
    Condition, EntityGroup, FieldConstraint, QueryDescriptor, ValueConstraint,
};

pub const GENDER: &str = "urn:mdr16:dataelement:23:1";
pub const AGE: &str = "urn:mdr16:dataelement:28:1";
pub const MATERIAL: &str = "urn:mdr16:dataelement:16:1";
pub const DIAGNOSIS: &str = "urn:mdr16:dataelement:27:1";
pub const BODY_WEIGHT: &str = "urn:mdr16:dataelement:37:1";
pub const UNMAPPED: &str = "urn:mdr16:dataelement:99:1";
pub const UNKNOWN: &str = "urn:mdr16:dataelement:404:1";

pub const CONFIG_XML: &str = include_str!("../fixtures/cql_config.xml");

pub fn resolver() -> ConfigResolver {
    ConfigResolver::from_xml(CONFIG_XML).unwrap_or_else(|e| panic!("Failed to load fixture config: {e}"))
}

pub fn field(urn: &str, values: Vec<ValueConstraint>) -> FieldConstraint {
    let mut field = FieldConstraint::new(urn);
    field.values = values;
    field
}

pub fn equals(urn: &str, value: &str) -> FieldConstraint {
    field(urn, vec![ValueConstraint::equals(value)])
}

pub fn single(group: EntityGroup, field: FieldConstraint) -> QueryDescriptor {
    QueryDescriptor::new().with_field(group, field)
}

/// A descriptor touching every mapped data element from several groups
pub fn mixed_query() -> QueryDescriptor {
    QueryDescriptor::new()
        .with_field(
            EntityGroup::Donor,
            field(GENDER, vec![ValueConstraint::equals("female"), ValueConstraint::equals("male")]),
        )
        .with_field(EntityGroup::Donor, field(AGE, vec![ValueConstraint::between(18i64, 65i64)]))
        .with_field(EntityGroup::Donor, field(BODY_WEIGHT, vec![ValueConstraint::between(50i64, 90i64)]))
        .with_field(EntityGroup::Sample, equals(MATERIAL, "blood-plasma"))
        .with_field(EntityGroup::Event, equals(DIAGNOSIS, "C50"))
        .with_field(EntityGroup::Event, equals(UNMAPPED, "x"))
        .with_field(
            EntityGroup::Sample,
            field(UNKNOWN, vec![ValueConstraint::new(Condition::Like, "%")]),
        )
}

pub fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
