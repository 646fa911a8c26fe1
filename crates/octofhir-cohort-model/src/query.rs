//! Query descriptors

use crate::essential::{EssentialEntity, EssentialField, EssentialQuery, EssentialValue};
use crate::{DataElementId, EntityGroup, ValueConstraint, ValueOperands};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Constraints on a single data element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraint {
    pub urn: DataElementId,
    #[serde(default)]
    pub values: Vec<ValueConstraint>,
}

impl FieldConstraint {
    pub fn new(urn: impl Into<DataElementId>) -> Self {
        Self {
            urn: urn.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: ValueConstraint) -> Self {
        self.values.push(value);
        self
    }

    /// Values that survive the emptiness filter
    pub fn non_empty_values(&self) -> impl Iterator<Item = &ValueConstraint> {
        self.values.iter().filter(|v| !v.is_empty())
    }
}

/// A cohort query: field constraints grouped by entity group
///
/// Groups are always visited donor, sample, event; fields keep their
/// insertion order inside a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDescriptor {
    groups: BTreeMap<EntityGroup, Vec<FieldConstraint>>,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, group: EntityGroup, field: FieldConstraint) -> Self {
        self.add_field(group, field);
        self
    }

    pub fn add_field(&mut self, group: EntityGroup, field: FieldConstraint) {
        self.groups.entry(group).or_default().push(field);
    }

    pub fn fields(&self, group: EntityGroup) -> &[FieldConstraint] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (EntityGroup, &[FieldConstraint])> {
        self.groups.iter().map(|(group, fields)| (*group, fields.as_slice()))
    }

    pub fn field_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Convert to the simplified DTO shape, rendering every typed value to text
    pub fn to_essential(&self) -> EssentialQuery {
        let entity = |group: EntityGroup| EssentialEntity {
            fields: self
                .fields(group)
                .iter()
                .map(|field| EssentialField {
                    urn: field.urn.clone(),
                    values: field
                        .values
                        .iter()
                        .map(|v| EssentialValue {
                            condition: v.condition,
                            value: v.value_text().map(|t| t.into_owned()).unwrap_or_default(),
                            max_value: v.max_value_text().map(|t| t.into_owned()).unwrap_or_default(),
                        })
                        .collect(),
                })
                .collect(),
        };

        EssentialQuery {
            donor: entity(EntityGroup::Donor),
            sample: entity(EntityGroup::Sample),
            event: entity(EntityGroup::Event),
        }
    }
}
