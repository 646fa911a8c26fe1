//! Codesystem definitions referenced by a query

use crate::source::QuerySource;
use indexmap::IndexSet;
use octofhir_cohort_config::{Codesystem, ConfigResolver};

#[derive(Debug, Clone, Copy)]
pub struct CodesystemDefinitionsFactory<'r> {
    resolver: &'r ConfigResolver,
}

impl<'r> CodesystemDefinitionsFactory<'r> {
    pub fn new(resolver: &'r ConfigResolver) -> Self {
        Self { resolver }
    }

    /// Distinct codesystems: the fixed ones first, then in field order.
    ///
    /// Identity is `(name, url)`, however many fields or groups reference it.
    pub fn collect<S: QuerySource>(&self, source: &S, fixed: &[Codesystem]) -> IndexSet<Codesystem> {
        let mut codesystems: IndexSet<Codesystem> = fixed.iter().cloned().collect();
        for field in source.fields() {
            codesystems.extend(self.resolver.codesystems(field.urn, None));
        }
        codesystems
    }

    /// One `codesystem` statement per line, empty when there are none
    pub fn create<S: QuerySource>(&self, source: &S, fixed: &[Codesystem]) -> String {
        self.collect(source, fixed)
            .iter()
            .map(|codesystem| format!("{}\n", codesystem.definition()))
            .collect()
    }
}
