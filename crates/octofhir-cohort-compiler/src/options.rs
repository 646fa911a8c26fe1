//! Transformer options
//!
//! Entity-group targets and field eligibility are deployment decisions, so
//! they are explicit inputs here rather than derived from group names.

use indexmap::IndexMap;
use octofhir_cohort_config::Codesystem;
use octofhir_cohort_model::{EntityGroup, EntityType};

/// Which fields may contribute to a compilation target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldScope {
    /// Every field of every group; configuration alone decides
    #[default]
    AllGroups,
    /// Only fields of groups mapped to the target entity type
    MatchingGroups,
}

/// Entity type each group compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTargets {
    pub donor: EntityType,
    pub sample: EntityType,
    pub event: EntityType,
}

impl Default for GroupTargets {
    fn default() -> Self {
        Self {
            donor: EntityType::Patient,
            sample: EntityType::Specimen,
            event: EntityType::Patient,
        }
    }
}

impl GroupTargets {
    pub fn with_event_target(mut self, entity_type: EntityType) -> Self {
        self.event = entity_type;
        self
    }

    pub fn target(&self, group: EntityGroup) -> EntityType {
        match group {
            EntityGroup::Donor => self.donor,
            EntityGroup::Sample => self.sample,
            EntityGroup::Event => self.event,
        }
    }

    /// Groups compiling to `entity_type`
    pub fn groups_for(&self, entity_type: EntityType) -> Vec<EntityGroup> {
        EntityGroup::ALL
            .into_iter()
            .filter(|group| self.target(*group) == entity_type)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerOptions {
    pub targets: GroupTargets,
    pub scope: FieldScope,
    /// Codesystems always declared for an entity type
    pub fixed_codesystems: IndexMap<EntityType, Vec<Codesystem>>,
}

impl Default for TransformerOptions {
    fn default() -> Self {
        let fixed_codesystems = EntityType::ALL
            .into_iter()
            .map(|entity_type| (entity_type, vec![Codesystem::loinc()]))
            .collect();

        Self {
            targets: GroupTargets::default(),
            scope: FieldScope::default(),
            fixed_codesystems,
        }
    }
}

impl TransformerOptions {
    pub fn with_targets(mut self, targets: GroupTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_fixed_codesystems(mut self, entity_type: EntityType, codesystems: Vec<Codesystem>) -> Self {
        self.fixed_codesystems.insert(entity_type, codesystems);
        self
    }

    pub fn fixed_codesystems_for(&self, entity_type: EntityType) -> &[Codesystem] {
        self.fixed_codesystems
            .get(&entity_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
