//! Adapters from descriptor shapes to the shared pipeline

use crate::atomic::{AtomicExpressionBuilder, ValuesExpressionFactory};
use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{
    DataElementId, EntityGroup, EntityType, EssentialQuery, EssentialValue, QueryDescriptor,
    ValueConstraint, ValueOperands,
};

/// One field as seen by the compiler
#[derive(Debug, Clone, Copy)]
pub struct SourceField<'a, V> {
    pub group: EntityGroup,
    pub urn: &'a DataElementId,
    pub values: &'a [V],
}

/// A descriptor shape the compiler can read fields from
pub trait QuerySource {
    type Value: ValueOperands;

    /// Every field of every group, in group then insertion order
    fn fields(&self) -> impl Iterator<Item = SourceField<'_, Self::Value>>;

    /// Or-joined atomic expression for the values of one field
    fn atomic_expression(
        resolver: &ConfigResolver,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[Self::Value],
    ) -> Option<String>;
}

impl QuerySource for QueryDescriptor {
    type Value = ValueConstraint;

    fn fields(&self) -> impl Iterator<Item = SourceField<'_, ValueConstraint>> {
        self.groups().flat_map(|(group, fields)| {
            fields.iter().map(move |field| SourceField {
                group,
                urn: &field.urn,
                values: &field.values,
            })
        })
    }

    fn atomic_expression(
        resolver: &ConfigResolver,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[ValueConstraint],
    ) -> Option<String> {
        AtomicExpressionBuilder::new(resolver).create_from_values(id, entity_type, values)
    }
}

impl QuerySource for EssentialQuery {
    type Value = EssentialValue;

    fn fields(&self) -> impl Iterator<Item = SourceField<'_, EssentialValue>> {
        EntityGroup::ALL.into_iter().flat_map(move |group| {
            self.entity(group).fields.iter().map(move |field| SourceField {
                group,
                urn: &field.urn,
                values: &field.values,
            })
        })
    }

    fn atomic_expression(
        resolver: &ConfigResolver,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[EssentialValue],
    ) -> Option<String> {
        ValuesExpressionFactory::new(resolver).create_from_values(id, entity_type, values)
    }
}

/// A source restricted to fields of some entity groups
#[derive(Debug, Clone)]
pub struct ScopedSource<'s, S> {
    inner: &'s S,
    groups: Vec<EntityGroup>,
}

impl<'s, S: QuerySource> ScopedSource<'s, S> {
    pub fn new(inner: &'s S, groups: Vec<EntityGroup>) -> Self {
        Self { inner, groups }
    }
}

impl<S: QuerySource> QuerySource for ScopedSource<'_, S> {
    type Value = S::Value;

    fn fields(&self) -> impl Iterator<Item = SourceField<'_, S::Value>> {
        self.inner
            .fields()
            .filter(|field| self.groups.contains(&field.group))
    }

    fn atomic_expression(
        resolver: &ConfigResolver,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[S::Value],
    ) -> Option<String> {
        S::atomic_expression(resolver, id, entity_type, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_cohort_model::{EssentialField, FieldConstraint};

    #[test]
    fn test_descriptor_fields_in_group_order() {
        let query = QueryDescriptor::new()
            .with_field(EntityGroup::Event, FieldConstraint::new("e"))
            .with_field(EntityGroup::Donor, FieldConstraint::new("d1"))
            .with_field(EntityGroup::Donor, FieldConstraint::new("d2"));

        let urns: Vec<_> = QuerySource::fields(&query).map(|f| f.urn.as_str()).collect();
        assert_eq!(urns, vec!["d1", "d2", "e"]);
    }

    #[test]
    fn test_essential_fields_in_group_order() {
        let query = EssentialQuery::new()
            .with_field(EntityGroup::Event, EssentialField::new("e"))
            .with_field(EntityGroup::Sample, EssentialField::new("s"));

        let fields: Vec<_> = query.fields().map(|f| (f.group, f.urn.as_str())).collect();
        assert_eq!(fields, vec![(EntityGroup::Sample, "s"), (EntityGroup::Event, "e")]);
    }

    #[test]
    fn test_scoped_source_filters_groups() {
        let query = QueryDescriptor::new()
            .with_field(EntityGroup::Donor, FieldConstraint::new("d"))
            .with_field(EntityGroup::Sample, FieldConstraint::new("s"));

        let scoped = ScopedSource::new(&query, vec![EntityGroup::Sample]);
        let urns: Vec<_> = scoped.fields().map(|f| f.urn.as_str()).collect();
        assert_eq!(urns, vec!["s"]);
    }
}
