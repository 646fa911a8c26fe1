//! Simplified query DTO posted by web clients
//!
//! Every value arrives as plain text. The JSON field names follow the
//! client payload (`donorDto`, `fieldsDto`, `valuesDto`, `maxValue`).

use crate::{Condition, DataElementId, EntityGroup, ValueOperands};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialQuery {
    #[serde(rename = "donorDto", default)]
    pub donor: EssentialEntity,
    #[serde(rename = "sampleDto", default)]
    pub sample: EssentialEntity,
    #[serde(rename = "eventDto", default)]
    pub event: EssentialEntity,
}

impl EssentialQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&self, group: EntityGroup) -> &EssentialEntity {
        match group {
            EntityGroup::Donor => &self.donor,
            EntityGroup::Sample => &self.sample,
            EntityGroup::Event => &self.event,
        }
    }

    pub fn entity_mut(&mut self, group: EntityGroup) -> &mut EssentialEntity {
        match group {
            EntityGroup::Donor => &mut self.donor,
            EntityGroup::Sample => &mut self.sample,
            EntityGroup::Event => &mut self.event,
        }
    }

    pub fn with_field(mut self, group: EntityGroup, field: EssentialField) -> Self {
        self.entity_mut(group).fields.push(field);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialEntity {
    #[serde(rename = "fieldsDto", default)]
    pub fields: Vec<EssentialField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialField {
    pub urn: DataElementId,
    #[serde(rename = "valuesDto", default)]
    pub values: Vec<EssentialValue>,
}

impl EssentialField {
    pub fn new(urn: impl Into<DataElementId>) -> Self {
        Self {
            urn: urn.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: EssentialValue) -> Self {
        self.values.push(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialValue {
    pub condition: Condition,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub max_value: String,
}

impl EssentialValue {
    pub fn new(condition: Condition, value: impl Into<String>) -> Self {
        Self {
            condition,
            value: value.into(),
            max_value: String::new(),
        }
    }

    pub fn between(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            condition: Condition::Between,
            value: min.into(),
            max_value: max.into(),
        }
    }
}

impl ValueOperands for EssentialValue {
    fn condition(&self) -> Condition {
        self.condition
    }

    fn value_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(&self.value))
    }

    fn max_value_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(&self.max_value))
    }
}
