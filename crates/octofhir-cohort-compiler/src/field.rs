//! Field expressions: atomic expressions wrapped in their resource path

use crate::source::QuerySource;
use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{DataElementId, EntityType};

#[derive(Debug, Clone, Copy)]
pub struct FieldExpressionFactory<'r> {
    resolver: &'r ConfigResolver,
}

impl<'r> FieldExpressionFactory<'r> {
    pub fn new(resolver: &'r ConfigResolver) -> Self {
        Self { resolver }
    }

    /// Path-wrapped expression for one field, `None` when no value applies.
    ///
    /// The path lookup result is returned as is, so an identity path
    /// template yields the atomic expression unchanged. Atomic expressions
    /// come from the builder of the source's descriptor shape.
    pub fn create<S: QuerySource>(
        &self,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[S::Value],
    ) -> Option<String> {
        let atomic = S::atomic_expression(self.resolver, id, entity_type, values)?;
        Some(self.resolver.path_expression(id, entity_type, &atomic))
    }
}
