//! Singleton statements referenced by a query

use crate::source::QuerySource;
use indexmap::IndexSet;
use octofhir_cohort_config::{ConfigResolver, Singleton};
use octofhir_cohort_model::EntityType;

#[derive(Debug, Clone, Copy)]
pub struct SingletonStatementsFactory<'r> {
    resolver: &'r ConfigResolver,
}

impl<'r> SingletonStatementsFactory<'r> {
    pub fn new(resolver: &'r ConfigResolver) -> Self {
        Self { resolver }
    }

    /// Distinct singletons bound for the target entity type, in field order
    pub fn collect<S: QuerySource>(&self, source: &S, entity_type: EntityType) -> IndexSet<Singleton> {
        let mut singletons = IndexSet::new();
        for field in source.fields() {
            singletons.extend(self.resolver.singletons(field.urn, entity_type));
        }
        singletons
    }

    /// One `define ... singleton from` statement per line followed by a
    /// blank line; empty when there are none
    pub fn create<S: QuerySource>(&self, source: &S, entity_type: EntityType) -> String {
        let singletons = self.collect(source, entity_type);
        if singletons.is_empty() {
            return String::new();
        }

        let mut block: String = singletons
            .iter()
            .map(|singleton| format!("{}\n", singleton.definition()))
            .collect();
        block.push('\n');
        block
    }
}
