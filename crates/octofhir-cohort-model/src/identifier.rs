//! Data element identifiers, entity types and entity groups

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque key of one queryable attribute, usually an MDR URN
/// (`urn:<namespace>:dataelement:<id>:<version>`).
///
/// The compiler only uses it as a lookup key and never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataElementId(String);

impl DataElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DataElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DataElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resource context a compiled predicate is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Patient,
    Specimen,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Patient, EntityType::Specimen];

    /// Name used in CQL `context` statements
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityType::Patient => "Patient",
            EntityType::Specimen => "Specimen",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(EntityType::Patient),
            "specimen" => Ok(EntityType::Specimen),
            _ => Err(ModelError::UnknownEntityType(s.to_string())),
        }
    }
}

/// Grouping of fields inside a query descriptor
///
/// The declaration order (donor, sample, event) is the order in which
/// groups are visited during compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityGroup {
    Donor,
    Sample,
    Event,
}

impl EntityGroup {
    pub const ALL: [EntityGroup; 3] = [EntityGroup::Donor, EntityGroup::Sample, EntityGroup::Event];

    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityGroup::Donor => "donor",
            EntityGroup::Sample => "sample",
            EntityGroup::Event => "event",
        }
    }
}

impl fmt::Display for EntityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityGroup {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "donor" | "patient" => Ok(EntityGroup::Donor),
            "sample" | "specimen" => Ok(EntityGroup::Sample),
            "event" => Ok(EntityGroup::Event),
            _ => Err(ModelError::UnknownEntityGroup(s.to_string())),
        }
    }
}
