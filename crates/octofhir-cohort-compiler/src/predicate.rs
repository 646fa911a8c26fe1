//! Population predicate

use crate::field::FieldExpressionFactory;
use crate::source::QuerySource;
use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::EntityType;

/// Predicate of an unconstrained query
pub const TRIVIAL_PREDICATE: &str = "true";

/// And-joins field expressions
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    conjuncts: Vec<String>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a conjunct; blank expressions are ignored
    pub fn push(&mut self, expression: impl Into<String>) -> &mut Self {
        let expression = expression.into();
        if !expression.trim().is_empty() {
            self.conjuncts.push(expression);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.conjuncts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conjuncts.is_empty()
    }

    /// The joined predicate, or `true` when nothing was added
    pub fn build(self) -> String {
        if self.conjuncts.is_empty() {
            TRIVIAL_PREDICATE.to_string()
        } else {
            self.conjuncts.join(" and ")
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PredicateFactory<'r> {
    fields: FieldExpressionFactory<'r>,
}

impl<'r> PredicateFactory<'r> {
    pub fn new(resolver: &'r ConfigResolver) -> Self {
        Self {
            fields: FieldExpressionFactory::new(resolver),
        }
    }

    /// Predicate over every field of every group.
    ///
    /// Group membership does not restrict which target a field can
    /// contribute to; only its configuration does.
    pub fn create<S: QuerySource>(&self, source: &S, entity_type: EntityType) -> String {
        let mut builder = PredicateBuilder::new();

        for field in source.fields() {
            match self.fields.create::<S>(field.urn, entity_type, field.values) {
                Some(expression) if !expression.trim().is_empty() => {
                    builder.push(expression);
                }
                Some(_) => log::debug!("No path template for '{}' ({}), field ignored", field.urn, entity_type),
                None => log::trace!("Field '{}' contributes nothing to {}", field.urn, entity_type),
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_is_trivially_true() {
        assert_eq!(PredicateBuilder::new().build(), "true");

        let mut builder = PredicateBuilder::new();
        builder.push("").push("   ");
        assert!(builder.is_empty());
        assert_eq!(builder.build(), "true");
    }

    #[test]
    fn test_builder_joins_in_order() {
        let mut builder = PredicateBuilder::new();
        builder.push("a").push("(b or c)").push("d");
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.build(), "a and (b or c) and d");
    }
}
